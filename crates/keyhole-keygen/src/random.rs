use crate::KeyGenerator;
use keyhole_core::LinkKey;
use rand::Rng;
use typed_builder::TypedBuilder;

/// Uppercase letters and digits. Every character survives URL encoding
/// unchanged, and the reduced alphabet keeps keys unambiguous when read
/// aloud or retyped.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A key generator drawing fixed-length random strings from a URL-safe
/// alphabet.
///
/// With the default 5-character keys the space holds 36^5 (~60M) values,
/// large relative to any table this store is meant for, so collisions stay
/// rare and the service's redraw loop almost never spins.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomKeyGenerator {
    #[builder(default = 5)]
    key_length: usize,
    #[builder(default = 8)]
    suffix_length: usize,
}

impl RandomKeyGenerator {
    fn sample(&self, length: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for RandomKeyGenerator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl KeyGenerator for RandomKeyGenerator {
    fn candidate(&self) -> LinkKey {
        LinkKey::new(self.sample(self.key_length))
    }

    fn secret_suffix(&self) -> String {
        self.sample(self.suffix_length)
    }
}
