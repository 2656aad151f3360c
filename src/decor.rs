use crate::random::RandomSource;

pub const FLOAT_KEYFRAMES: &str = "@keyframes float {
    0%, 100% { transform: translateY(0); }
    50% { transform: translateY(-5px); }
}";

/// CSS `animation` value for one floating context word: 3-5s period, up to 2s
/// start delay.
pub fn float_animation<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let duration = 3.0 + rng.next_unit() * 2.0;
    let delay = rng.next_unit() * 2.0;
    format!("float {duration}s ease-in-out {delay}s infinite")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_uses_both_samples() {
        let mut samples = [0.5, 0.25].into_iter();
        let mut rng = move || samples.next().unwrap_or(0.0);
        assert_eq!(
            float_animation(&mut rng),
            "float 4s ease-in-out 0.5s infinite"
        );
    }
}
