//! Domain model (identifiers, datastreams, temp files, outcomes, ...).

pub mod ids;
pub mod datastream;
pub mod object;
pub mod temp_file;
pub mod derivative;
pub mod outcome;
pub mod errors;

pub use ids::{DatastreamId, IdError, Pid, UserId};
pub use datastream::{ControlGroup, Datastream};
pub use object::RepositoryObject;
pub use temp_file::{Ownership, TempFile};
pub use derivative::{DerivativeKind, UpscalePolicy, UPSCALE_IMAGES_KEY};
pub use outcome::{Channel, Message, OutcomeKind, OutcomeRecord, Severity};
pub use errors::{DerivaError, error_chain};
