//! Asset synthesis: submit, poll, download and key each image prompt.

mod keying;
mod pipeline;
mod poll;
mod task;

pub use keying::{Hsv, is_background, key_background};
pub use pipeline::AssetPipeline;
pub use poll::PollSchedule;
pub use task::{AssetState, AssetTask};
