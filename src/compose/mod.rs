pub mod choice;
pub mod describe;
pub mod normalize;

pub use choice::resolve_choice;
pub use describe::{CompositionResult, DescriptionRequest, OutfitComposer};
pub use normalize::clean_description;
