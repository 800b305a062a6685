pub mod character;
pub mod playback;
pub mod story;
pub mod story_elements;
pub mod theme;
