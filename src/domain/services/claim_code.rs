use rand::Rng;

/// No 0/O or 1/I so codes survive being read aloud at the counter.
pub const CLAIM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const CLAIM_CODE_LENGTH: usize = 8;
pub const MAX_CLAIM_CODE_ATTEMPTS: usize = 5;

pub fn generate_claim_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CLAIM_CODE_LENGTH)
        .map(|_| CLAIM_CODE_ALPHABET[rng.gen_range(0..CLAIM_CODE_ALPHABET.len())] as char)
        .collect()
}

pub fn is_well_formed(code: &str) -> bool {
    code.len() == CLAIM_CODE_LENGTH && code.bytes().all(|b| CLAIM_CODE_ALPHABET.contains(&b))
}
