//! Gaze input: landmark frames from an external face detector are reduced
//! to a single gaze vector and handed to the render loop through a
//! single-slot channel.

mod adapter;
mod feed;

pub use adapter::{eye_offset, on_landmarks, GazeAdapter, LEFT_EYE, MIN_LANDMARKS, RIGHT_EYE};
pub use feed::{
    gaze_channel, run_feed, FeedStats, GazeFeed, GazeFeedError, GazePublisher, GazeReceiver,
    LandmarkSource,
};
