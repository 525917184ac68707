//! Amount splitting strategies for the transaction builder
//!
//! `split_amounts` partitions destinations across several transactions when
//! one alone would be too big; the split strategies decide how a single
//! transaction's destination amounts decompose into outputs.

use transaction_util::amounts::decompose_amount_into_digits;
use transaction_util::TXDestination;

/// A destination splitting policy: `(destinations, change, dust_threshold)`
/// to `(split destinations, dust)`
pub type SplitStrategy =
    fn(&[TXDestination], Option<&TXDestination>, u64) -> (Vec<TXDestination>, u64);

/// The normal policy: every destination amount and the change are broken
/// into canonical digit denominations, each becoming its own output
///
/// Sub-threshold remainders of the *destinations* still become outputs (the
/// recipient should get their full amount); only the change's remainder is
/// reported as dust for the dust policy to resolve.
pub fn digit_split_strategy(
    dsts: &[TXDestination],
    change_dst: Option<&TXDestination>,
    dust_threshold: u64,
) -> (Vec<TXDestination>, u64) {
    let mut splitted_dsts = Vec::new();
    let mut dust = 0;

    for de in dsts {
        let mut local_chunks = Vec::new();
        let mut local_dust = None;
        decompose_amount_into_digits(
            de.amount,
            dust_threshold,
            |chunk| local_chunks.push(chunk),
            |a_dust| local_dust = Some(a_dust),
        );
        if let Some(a_dust) = local_dust {
            splitted_dsts.push(TXDestination {
                amount: a_dust,
                addr: de.addr,
            });
        }
        for chunk in local_chunks {
            splitted_dsts.push(TXDestination {
                amount: chunk,
                addr: de.addr,
            });
        }
    }

    if let Some(change) = change_dst {
        decompose_amount_into_digits(
            change.amount,
            dust_threshold,
            |chunk| {
                splitted_dsts.push(TXDestination {
                    amount: chunk,
                    addr: change.addr,
                })
            },
            |a_dust| dust = a_dust,
        );
    }

    (splitted_dsts, dust)
}

/// Pass-through policy retained for tests: destinations are kept as-is and
/// only the change's sub-threshold remainder is reported as dust
pub fn null_split_strategy(
    dsts: &[TXDestination],
    change_dst: Option<&TXDestination>,
    dust_threshold: u64,
) -> (Vec<TXDestination>, u64) {
    let splitted_dsts = dsts.to_vec();

    let mut dust = 0;
    if let (Some(change), true) = (change_dst, dust_threshold > 0) {
        let mut order = 10;
        while order <= 10 * dust_threshold {
            let dust_candidate = change.amount % order;
            if dust_candidate <= dust_threshold {
                dust = dust_candidate;
            } else {
                break;
            }
            order *= 10;
        }
    }

    (splitted_dsts, dust)
}

/// Splits every destination amount into `num_splits` near-equal parts, one
/// part per future transaction; the last part absorbs the remainder
pub fn split_amounts(dsts: &[TXDestination], num_splits: usize) -> Vec<Vec<TXDestination>> {
    if num_splits <= 1 {
        return vec![dsts.to_vec()];
    }

    let mut ret = Vec::with_capacity(num_splits);
    for i in 0..num_splits {
        let new_dsts = dsts
            .iter()
            .map(|dst| {
                let mut amount = dst.amount / num_splits as u64;
                if i + 1 == num_splits {
                    amount += dst.amount % num_splits as u64;
                }
                TXDestination {
                    amount,
                    addr: dst.addr,
                }
            })
            .collect();
        ret.push(new_dsts);
    }
    ret
}
