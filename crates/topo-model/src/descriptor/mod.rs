mod deploy;
pub use deploy::DeployOptions;

mod submission;
pub use submission::SubmissionDescriptor;
