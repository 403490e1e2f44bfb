pub mod animation;
pub mod collision;
pub mod hierarchy;
pub mod normalize;
pub mod placement;
pub mod sizing;
