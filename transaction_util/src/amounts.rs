//! Amount decomposition and ring offset encoding

/// Splits `amount` into canonical `k · 10^p` digit denominations
///
/// Every nonzero decimal digit of the amount becomes one chunk, except that
/// the low-order portion at or below `dust_threshold` is accumulated and
/// reported through `dust_handler` instead (at most once, and only when
/// nonzero). Denominated outputs widen the anonymity set, since every ring
/// member must carry the same amount.
pub fn decompose_amount_into_digits(
    amount: u64,
    dust_threshold: u64,
    mut chunk_handler: impl FnMut(u64),
    mut dust_handler: impl FnMut(u64),
) {
    if amount == 0 {
        return;
    }

    let mut amount = amount;
    let mut is_dust_handled = false;
    let mut dust = 0u64;
    let mut order = 1u64;

    while amount != 0 {
        let chunk = (amount % 10) * order;
        amount /= 10;
        order = order.saturating_mul(10);

        if dust + chunk <= dust_threshold {
            dust += chunk;
        } else {
            if !is_dust_handled && dust != 0 {
                dust_handler(dust);
                is_dust_handled = true;
            }
            if chunk != 0 {
                chunk_handler(chunk);
            }
        }
    }

    if !is_dust_handled && dust != 0 {
        dust_handler(dust);
    }
}

/// Converts sorted absolute global output indices into the delta-encoded
/// form used on the wire
///
/// The input is sorted defensively; ring member lists are expected to arrive
/// already ordered.
pub fn absolute_output_offsets_to_relative(offsets: &[u64]) -> Vec<u64> {
    let mut res = offsets.to_vec();
    if res.is_empty() {
        return res;
    }
    res.sort_unstable();
    for i in (1..res.len()).rev() {
        res[i] -= res[i - 1];
    }
    res
}

/// Converts delta-encoded offsets back into absolute global output indices
pub fn relative_output_offsets_to_absolute(offsets: &[u64]) -> Vec<u64> {
    let mut res = offsets.to_vec();
    for i in 1..res.len() {
        res[i] += res[i - 1];
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decompose(amount: u64, dust_threshold: u64) -> (Vec<u64>, Vec<u64>) {
        let mut chunks = Vec::new();
        let mut dust = Vec::new();
        decompose_amount_into_digits(
            amount,
            dust_threshold,
            |chunk| chunks.push(chunk),
            |d| dust.push(d),
        );
        (chunks, dust)
    }

    #[test]
    fn it_decomposes_into_digits() {
        let (chunks, dust) = decompose(123_456, 0);
        assert_eq!(chunks, vec![6, 50, 400, 3_000, 20_000, 100_000]);
        assert!(dust.is_empty());
        assert_eq!(chunks.iter().sum::<u64>(), 123_456);
    }

    #[test]
    fn it_collects_dust_below_the_threshold() {
        let (chunks, dust) = decompose(123_456, 500);
        assert_eq!(chunks, vec![3_000, 20_000, 100_000]);
        assert_eq!(dust, vec![456]);
        assert_eq!(chunks.iter().sum::<u64>() + dust[0], 123_456);
    }

    #[test]
    fn fully_dusty_amounts_produce_one_dust_call() {
        let (chunks, dust) = decompose(456, 1_000);
        assert!(chunks.is_empty());
        assert_eq!(dust, vec![456]);
    }

    #[test]
    fn zero_produces_nothing() {
        let (chunks, dust) = decompose(0, 1_000);
        assert!(chunks.is_empty());
        assert!(dust.is_empty());
    }

    #[test]
    fn offsets_round_trip() {
        let absolute = vec![3, 7, 20, 21, 100];
        let relative = absolute_output_offsets_to_relative(&absolute);
        assert_eq!(relative, vec![3, 4, 13, 1, 79]);
        assert_eq!(relative_output_offsets_to_absolute(&relative), absolute);

        let single = vec![42];
        assert_eq!(
            relative_output_offsets_to_absolute(&absolute_output_offsets_to_relative(&single)),
            single
        );
        assert!(absolute_output_offsets_to_relative(&[]).is_empty());
    }
}
