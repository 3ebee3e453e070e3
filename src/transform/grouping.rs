/// Position of each bar inside its run of adjacent x values.
///
/// A value exactly one unit from the previous run member continues the run
/// (position + 1); a gap larger than one starts a new run (position 0).
/// Values closer than one unit keep the current position.
pub fn run_positions(x: &[f64]) -> Vec<usize> {
    let mut positions = Vec::with_capacity(x.len());
    let mut reference: Option<f64> = None;
    let mut pos = 0usize;

    for &xi in x {
        match reference {
            Some(r) if (xi - r).abs() == 1.0 => {
                pos += 1;
                reference = Some(xi);
            }
            Some(r) if (xi - r).abs() < 1.0 => {}
            _ => {
                pos = 0;
                reference = Some(xi);
            }
        }
        positions.push(pos);
    }
    positions
}

/// Bars regrouped by run position: `groups[p]` holds the indices of every
/// bar sitting at position `p` of its run. Each group is drawn in its own
/// color.
pub fn group_by_position(x: &[f64]) -> Vec<Vec<usize>> {
    let positions = run_positions(x);
    let n_groups = positions.iter().max().map_or(0, |m| m + 1);
    let mut groups = vec![Vec::new(); n_groups];
    for (i, p) in positions.into_iter().enumerate() {
        groups[p].push(i);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_restart_after_gaps() {
        let x = [1.0, 2.0, 3.0, 5.0, 6.0, 10.0];
        assert_eq!(run_positions(&x), vec![0, 1, 2, 0, 1, 0]);
    }

    #[test]
    fn groups_collect_same_positions() {
        let x = [1.0, 2.0, 3.0, 5.0, 6.0];
        assert_eq!(group_by_position(&x), vec![vec![0, 3], vec![1, 4], vec![2]]);
        assert!(group_by_position(&[]).is_empty());
    }

    #[test]
    fn sub_unit_steps_stay_in_place() {
        assert_eq!(run_positions(&[1.0, 1.5, 2.0]), vec![0, 0, 1]);
    }
}
