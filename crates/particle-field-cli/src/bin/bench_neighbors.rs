use particle_field_core::{DeviceClass, Field};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::time::Instant;

fn main() {
    let widths = [320.0, 480.0, 768.0, 1280.0, 1920.0, 2560.0];
    for width in widths {
        let height = width * 0.75;
        let class = DeviceClass::from_width(width);
        let mut rng = ChaCha12Rng::seed_from_u64(42);

        let start = Instant::now();
        let field = Field::build(width, height, class, 0, &mut rng);
        let elapsed = start.elapsed();

        println!(
            "width {:>6}: {:?} density {:>2}, {:>5} particles, field + neighbor build in {:?}",
            width,
            class,
            field.density,
            field.len(),
            elapsed
        );
    }
}
