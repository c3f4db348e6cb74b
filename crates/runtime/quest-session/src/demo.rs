//! Demo item generator

use crate::session::NewItem;
use rand::seq::SliceRandom;
use rand::Rng;

const NAMES: [&str; 8] = [
    "Laptop", "Headphones", "Keyboard", "Mouse", "Monitor", "Tablet", "Speaker", "Camera",
];
const ADJECTIVES: [&str; 6] = ["Pro", "Max", "Lite", "X", "Plus", "Neo"];

/// A plausible product: price in [49, 1549) rounded to cents, quantity 1..=8
pub fn random_item<R: Rng + ?Sized>(rng: &mut R) -> NewItem {
    let noun = NAMES.choose(rng).copied().unwrap_or("Gadget");
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Pro");
    let price = (rng.gen_range(49.0..1549.0_f64) * 100.0).round() / 100.0;

    NewItem {
        name: format!("{noun} {adjective}"),
        description: Some("Auto-generated demo item".to_string()),
        price,
        quantity: rng.gen_range(1..=8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_item_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let item = random_item(&mut rng);
            assert!((49.0..=1549.0).contains(&item.price));
            assert!((1..=8).contains(&item.quantity));
            assert_eq!(format!("{:.2}", item.price).parse::<f64>().unwrap(), item.price);
            assert_eq!(item.name.split(' ').count(), 2);
        }
    }
}
