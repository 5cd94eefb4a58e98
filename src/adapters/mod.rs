//! Adapter implementations for each port: live, recording and replaying.

pub mod live;
pub mod recording;
pub mod replaying;
