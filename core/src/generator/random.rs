use alloc::vec::Vec;

use ndarray::Array2;

use super::*;

/// Uniform placement without replacement, reproducible from `seed`.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;
        use rand::rngs::SmallRng;

        let config = GameConfig::new(config.size, config.mines).inspect_err(|err| {
            log::warn!("Refusing to generate layout: {}", err);
        })?;
        let total_cells = usize::from(config.total_cells());
        let mines = usize::from(config.mines);

        // partial Fisher-Yates: the first `mines` slots end up a uniform sample
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut cells: Vec<usize> = (0..total_cells).collect();
        for i in 0..mines {
            let pick = rng.random_range(i..total_cells);
            cells.swap(i, pick);
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        for &index in &cells[..mines] {
            mine_mask[from_flat_index(index, config.size.1).to_nd_index()] = true;
        }

        log::debug!(
            "Generated {}x{} layout with {} mines from seed {}",
            config.size.0,
            config.size.1,
            mines,
            self.seed
        );
        Ok(MineLayout::new_unchecked(mine_mask, config.mines))
    }
}
