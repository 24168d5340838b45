//! Arithmetic on a cyclic position domain `[0, loop_size)`.

/// Wrap a position into `[0, loop_size)`.
///
/// `loop_size` must be positive.
#[inline]
pub fn wrap(position: i64, loop_size: i64) -> i64 {
    position.rem_euclid(loop_size)
}

/// Shortest signed movement from `current` to a position congruent to
/// `target` on a loop of `loop_size` positions.
///
/// Both positions may be given unwrapped. Of the forward and backward paths
/// the shorter is returned; on a tie the path that does not pass through the
/// wrap point wins. The result is zero when the positions already coincide
/// and its magnitude never exceeds `loop_size / 2`.
///
/// `loop_size` must be positive.
pub fn closest_loop_movement(current: i64, target: i64, loop_size: i64) -> i64 {
    let current = wrap(current, loop_size);
    let target = wrap(target, loop_size);
    if current == target {
        return 0;
    }

    let (lower, upper) = if target < current {
        (target, target + loop_size)
    } else {
        (target - loop_size, target)
    };

    let backward = lower - current;
    let forward = upper - current;
    let direct = if target < current { backward } else { forward };

    match (-backward).cmp(&forward) {
        core::cmp::Ordering::Less => backward,
        core::cmp::Ordering::Greater => forward,
        core::cmp::Ordering::Equal => direct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(0, 200), 0);
        assert_eq!(wrap(200, 200), 0);
        assert_eq!(wrap(-1, 200), 199);
        assert_eq!(wrap(401, 200), 1);
    }

    #[test]
    fn test_forward_without_wrap() {
        assert_eq!(closest_loop_movement(0, 50, 200), 50);
        assert_eq!(closest_loop_movement(10, 60, 200), 50);
    }

    #[test]
    fn test_backward_without_wrap() {
        assert_eq!(closest_loop_movement(60, 10, 200), -50);
    }

    #[test]
    fn test_shorter_path_crosses_zero() {
        assert_eq!(closest_loop_movement(10, 190, 200), -20);
        assert_eq!(closest_loop_movement(190, 10, 200), 20);
    }

    #[test]
    fn test_same_position() {
        assert_eq!(closest_loop_movement(5, 5, 200), 0);
        assert_eq!(closest_loop_movement(5, 205, 200), 0);
        assert_eq!(closest_loop_movement(-195, 5, 200), 0);
    }

    #[test]
    fn test_tie_takes_direct_path() {
        assert_eq!(closest_loop_movement(0, 100, 200), 100);
        assert_eq!(closest_loop_movement(100, 0, 200), -100);
        assert_eq!(closest_loop_movement(1, 0, 2), -1);
        assert_eq!(closest_loop_movement(0, 1, 2), 1);
    }
}
