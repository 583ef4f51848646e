use log::debug;

/// Drop candidate steps that do not belong to a sustained walking run.
///
/// A run is a maximal sequence of candidates whose successive gaps are below
/// `tao_max` samples. Runs shorter than `min_consecutive` are removed whole.
/// If fewer than `min_consecutive` steps survive the result is emptied.
/// `min_consecutive <= 1` disables the filter.
///
/// `candidates` are expected in increasing order, as the peak scan emits them.
/// A descending pair ends the current run.
pub(crate) fn filter_runs(candidates: &[usize], min_consecutive: usize, tao_max: f64) -> Vec<usize> {
    if min_consecutive <= 1 {
        return candidates.to_vec();
    }

    let mut kept = Vec::with_capacity(candidates.len());
    for run in candidates.chunk_by(|a, b| b.checked_sub(*a).is_some_and(|gap| (gap as f64) < tao_max)) {
        if run.len() >= min_consecutive {
            kept.extend_from_slice(run);
        } else {
            debug!(
                "dropping run of {} step(s) starting at sample {}",
                run.len(),
                run[0]
            );
        }
    }

    if kept.len() < min_consecutive {
        kept.clear();
    }
    kept
}
