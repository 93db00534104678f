use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    /// Fails for configurations [`GameConfig::new`] would reject.
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}
