//! CPF (Cadastro de Pessoas Fisicas) tax ids.

use rand::Rng;

/// Generates a random CPF with valid check digits, formatted `000.000.000-00`.
pub fn generate_cpf<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut digits = [0u32; 11];
    loop {
        for digit in digits.iter_mut().take(9) {
            *digit = rng.gen_range(0..10);
        }
        // Repeated-digit bases pass the checksum but are not issued.
        if digits[..9].iter().any(|d| *d != digits[0]) {
            break;
        }
    }

    digits[9] = check_digit(&digits[..9]);
    digits[10] = check_digit(&digits[..10]);

    let s: String = digits
        .iter()
        .filter_map(|d| std::char::from_digit(*d, 10))
        .collect();
    format!("{}.{}.{}-{}", &s[0..3], &s[3..6], &s[6..9], &s[9..11])
}

/// Checks an 11-digit CPF, ignoring punctuation.
pub fn is_valid_cpf(value: &str) -> bool {
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    digits[9] == check_digit(&digits[..9]) && digits[10] == check_digit(&digits[..10])
}

fn check_digit(base: &[u32]) -> u32 {
    let weight_start = base.len() as u32 + 1;
    let sum: u32 = base
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    let rest = (sum * 10) % 11;
    if rest == 10 {
        0
    } else {
        rest
    }
}
