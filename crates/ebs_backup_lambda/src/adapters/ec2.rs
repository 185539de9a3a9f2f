use ebs_backup_core::contract::{InstanceDescription, ResourceTag, VolumeSummary};

pub trait Ec2Api {
    fn describe_regions(&self) -> Result<Vec<String>, String>;

    /// Volumes in the client's region whose status matches `status`.
    fn describe_volumes(&self, status: &str) -> Result<Vec<VolumeSummary>, String>;

    /// Returns the id of the created snapshot.
    fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<String, String>;

    fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceDescription>, String>;

    fn create_tags(&self, resource_id: &str, tags: &[ResourceTag]) -> Result<(), String>;
}

pub trait RegionalEc2 {
    fn client_for_region(&self, region: &str) -> Box<dyn Ec2Api + '_>;
}
