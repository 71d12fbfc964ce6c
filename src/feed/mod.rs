pub mod carousel;
pub mod interleaver;

pub use carousel::{Carousel, RotationTimer};
pub use interleaver::{ContentItem, FeedEntry, SlotKind, interleave};
