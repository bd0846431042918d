//! Two-phase delta-debugging search (ddmin).
//!
//! Phase 1 removes large contiguous blocks, refining granularity only when
//! stuck; Phase 2 sweeps single lines bottom-to-top. Both phases operate
//! purely on the session's candidate through the injected predicate and
//! treat a failed trial as an ordinary discard, never an error. The result
//! is 1-minimal with respect to single-line deletion, but greedy — not
//! guaranteed globally minimal.

use crate::error::ReduceError;
use crate::predicate::Predicate;
use crate::session::ReductionSession;

/// Run the full reduction: initial reproduction check, then both phases.
pub fn reduce<P: Predicate + ?Sized>(
    session: &mut ReductionSession,
    predicate: &mut P,
    verbose: bool,
) -> Result<(), ReduceError> {
    check_initial(session, predicate)?;
    reduce_blocks(session, predicate, verbose);
    reduce_lines(session, predicate, verbose);
    Ok(())
}

/// Evaluate the predicate once against the pristine input.
///
/// This is the only fatal condition on the reduction path: a false result
/// means there is no divergence to shrink, and nothing may be written.
pub fn check_initial<P: Predicate + ?Sized>(
    session: &mut ReductionSession,
    predicate: &mut P,
) -> Result<(), ReduceError> {
    let initial = session.current().clone();
    if session.test(predicate, &initial) {
        Ok(())
    } else {
        Err(ReduceError::InitialReproductionFailed {
            rule_id: session.spec().rule_id.clone(),
            kind: session.spec().kind,
        })
    }
}

/// Phase 1: coarse block deletion.
///
/// Partitions the candidate into `n` contiguous chunks (the final chunk
/// absorbs the remainder) and tries deleting each in order. The first
/// success is adopted and `n` steps back to `max(2, n - 1)` so the next
/// round retries even larger deletions; a full scan without success doubles
/// `n`. Converges once `n` exceeds the line count.
pub fn reduce_blocks<P: Predicate + ?Sized>(
    session: &mut ReductionSession,
    predicate: &mut P,
    verbose: bool,
) {
    let mut n = 2usize;
    while n <= session.current().len() {
        let len = session.current().len();
        let chunk_size = (len / n).max(1);
        let mut reduced = false;

        for i in 0..n {
            let start = i * chunk_size;
            let end = if i + 1 < n { start + chunk_size } else { len };
            let Some(candidate) = session.current().without_span(start..end) else {
                continue;
            };

            if verbose {
                eprintln!(
                    "  Phase 1: trying delete chunk {}/{} (lines {}-{}, {} remaining)",
                    i + 1,
                    n,
                    start + 1,
                    end,
                    candidate.len()
                );
            }

            if session.test(predicate, &candidate) {
                if verbose {
                    eprintln!("  Phase 1: accepted! {} -> {} lines", len, candidate.len());
                }
                session.adopt(candidate);
                // Step granularity back so the next round retries larger
                // deletions against the shrunken candidate.
                n = (n - 1).max(2);
                reduced = true;
                break;
            }
        }

        if !reduced {
            n *= 2;
        }
    }
}

/// Phase 2: fine single-line deletion, one pass from the last line to the
/// first. Each adopted deletion shifts nothing below the sweep position, so
/// indices stay valid relative to the current state.
pub fn reduce_lines<P: Predicate + ?Sized>(
    session: &mut ReductionSession,
    predicate: &mut P,
    verbose: bool,
) {
    let mut i = session.current().len();
    while i > 0 {
        i -= 1;
        let Some(candidate) = session.current().without_line(i) else {
            continue;
        };

        if verbose {
            eprintln!(
                "  Phase 2: trying delete line {}/{} ({} remaining)",
                i + 1,
                session.current().len(),
                candidate.len()
            );
        }

        if session.test(predicate, &candidate) {
            if verbose {
                eprintln!("  Phase 2: accepted! removed line {}", i + 1);
            }
            session.adopt(candidate);
        }
    }
}
