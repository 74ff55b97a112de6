//! Production: per-line output, shared material draw, efficiency decay.
//!
//! Lines are evaluated in list order so partial ticks are reproducible.
//! Output is computed from the efficiency the day opened with; wear lands
//! after the batch. Material is debited once, after every line has been
//! evaluated, and the cumulative draw never exceeds the opening stock.

use rand::Rng;
use sim_core::{GameState, LineStatus, Severity};

/// Daily efficiency wear, uniform percentage points.
const DECAY_MIN: f32 = 1.0;
const DECAY_MAX: f32 = 2.0;

pub fn run<R: Rng>(state: &mut GameState, rng: &mut R) {
    let opening_stock = state.silicon;
    let mut drawn = 0u64;
    let mut starved = false;

    for i in 0..state.lines.len() {
        if state.lines[i].status != LineStatus::Producing {
            continue;
        }
        let decay = rng.gen_range(DECAY_MIN..=DECAY_MAX);
        let (product, batch, need) = {
            let line = &state.lines[i];
            let batch = (line.base_daily_output as f32
                * line.specialization.output_multiplier()
                * (line.efficiency / 100.0))
                .floor() as u64;
            (line.product, batch, batch * line.specialization.material_per_unit())
        };
        {
            let line = &mut state.lines[i];
            line.efficiency = (line.efficiency - decay).max(0.0);
        }
        if batch == 0 {
            continue;
        }
        if drawn + need > opening_stock {
            starved = true;
            continue;
        }
        drawn += need;
        *state.inventory.get_mut(product) += batch;
    }

    state.silicon = opening_stock - drawn;
    if starved {
        state.push_log(
            Severity::Warning,
            "Some production lines idled: not enough silicon in stock.",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sim_core::{Catalog, LineSpecialization, Product, ProductionLine};

    fn line(id: u32, product: Product, spec: LineSpecialization) -> ProductionLine {
        ProductionLine {
            id,
            product,
            status: LineStatus::Producing,
            base_daily_output: 10,
            specialization: spec,
            efficiency: 100.0,
        }
    }

    fn setup() -> (GameState, ChaCha8Rng) {
        let catalog = Catalog::standard();
        let mut state = GameState::new_game(&catalog, 3);
        state.lines.clear();
        (state, ChaCha8Rng::seed_from_u64(3))
    }

    #[test]
    fn efficiency_branch_consumes_less_material() {
        let (mut state, mut rng) = setup();
        state.lines.push(line(1, Product::CPU, LineSpecialization::Efficiency));
        state.silicon = 60;
        run(&mut state, &mut rng);
        // 10 units at 6 silicon each.
        assert_eq!(state.inventory.cpu, 10);
        assert_eq!(state.silicon, 0);
    }

    #[test]
    fn starved_lines_skip_in_stable_order() {
        let (mut state, mut rng) = setup();
        state.lines.push(line(1, Product::CPU, LineSpecialization::Standard));
        state.lines.push(line(2, Product::GPU, LineSpecialization::Standard));
        state.silicon = 150; // enough for the first line only
        run(&mut state, &mut rng);
        assert_eq!(state.inventory.cpu, 10);
        assert_eq!(state.inventory.gpu, 0);
        assert_eq!(state.silicon, 50);
        assert!(state.log.iter().any(|e| e.message.contains("idled")));
    }

    #[test]
    fn idle_lines_neither_produce_nor_wear() {
        let (mut state, mut rng) = setup();
        let mut idle = line(1, Product::GPU, LineSpecialization::Standard);
        idle.status = LineStatus::Idle;
        state.lines.push(idle);
        state.silicon = 1_000;
        run(&mut state, &mut rng);
        assert_eq!(state.inventory.gpu, 0);
        assert_eq!(state.lines[0].efficiency, 100.0);
        assert_eq!(state.silicon, 1_000);
    }

    #[test]
    fn efficiency_floors_at_zero_and_stops_output() {
        let (mut state, mut rng) = setup();
        let mut worn = line(1, Product::CPU, LineSpecialization::Standard);
        worn.efficiency = 0.5;
        state.lines.push(worn);
        state.silicon = 1_000;
        run(&mut state, &mut rng);
        assert_eq!(state.lines[0].efficiency, 0.0);
        // floor(10 x 1.0 x 0.005) = 0 units.
        assert_eq!(state.inventory.cpu, 0);
        assert_eq!(state.silicon, 1_000);
    }

    #[test]
    fn draw_never_exceeds_opening_stock() {
        let (mut state, _) = setup();
        for id in 0..6 {
            state.lines.push(line(id, Product::CPU, LineSpecialization::Speed));
        }
        for seed in 0..50u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for l in &mut state.lines {
                l.efficiency = 100.0;
            }
            state.silicon = 400;
            state.inventory.cpu = 0;
            run(&mut state, &mut rng);
            assert!(state.silicon <= 400);
        }
    }
}
