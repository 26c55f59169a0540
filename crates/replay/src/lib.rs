mod builder;
mod cache;
mod classify;
mod device;
mod hour;
mod parser;
mod paths;
mod scheduler;
mod types;

pub use builder::build_records;
pub use cache::CatalogCache;
pub use classify::{classify, resolve};
pub use device::DeviceResolver;
pub use hour::process_hour;
pub use parser::parse_line;
pub use paths::log_file_path;
pub use scheduler::run_replay;
pub use types::{
    BucketOutcome, ClassifiedHit, HourStats, RawHit, ReplayError, ReplayStats, ResolvedAsset,
    Result,
};
