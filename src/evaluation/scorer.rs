use super::evaluator::Evaluator;
use crate::cards::*;
use crate::hands::*;
use crate::*;

/// Head-to-head settlement between two boards.
pub struct Scorer;

impl Scorer {
    /// Points `a` wins from `b`.
    ///
    /// One point per line won (minus one per line lost), a scoop bonus
    /// when one side takes all three, then the royalty difference.
    /// Always equal to the negation of the reverse comparison.
    pub fn calculate_hand_score(a: &Hand, b: &Hand) -> Points {
        let lines = Evaluator::line_scores(a)
            .into_iter()
            .zip(Evaluator::line_scores(b))
            .map(|(x, y)| match x.cmp(&y) {
                std::cmp::Ordering::Greater => 1,
                std::cmp::Ordering::Less => -1,
                std::cmp::Ordering::Equal => 0,
            })
            .sum::<Points>();
        let scoop = match lines {
            3 => SCOOP_BONUS,
            -3 => -SCOOP_BONUS,
            _ => 0,
        };
        lines + scoop + Evaluator::royalties(a) - Evaluator::royalties(b)
    }
    /// Complete board whose top line is exactly a pair of queens or better.
    /// Top trips do not qualify.
    pub fn is_fantasy_qualified(hand: &Hand) -> bool {
        if !hand.is_complete() {
            return false;
        }
        let top = hand.top();
        let mut ranks = top.iter().map(Card::rank).collect::<Vec<_>>();
        ranks.sort();
        ranks.dedup();
        if ranks.len() != 2 {
            return false;
        }
        ranks
            .into_iter()
            .find(|r| top.iter().filter(|c| c.rank() == *r).count() == 2)
            .map_or(false, |pair| pair >= Rank::Queen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(top: &str, middle: &str, bottom: &str) -> Hand {
        Hand::from_lines(
            Card::parse(top).unwrap(),
            Card::parse(middle).unwrap(),
            Card::parse(bottom).unwrap(),
        )
    }

    #[test]
    fn scoop_adds_bonus() {
        let strong = board("Qc Qd 2h", "7c 7d 7h Ks 2c", "9c 9d 9h 9s 2s");
        let weak = board("3c 4d 5h", "8c 9d Jh Ks 2d", "Tc Td 3h 6s 7s");
        // 3 lines + 3 scoop + (1 + 2 + 10) royalties
        assert_eq!(Scorer::calculate_hand_score(&strong, &weak), 19);
        assert_eq!(Scorer::calculate_hand_score(&weak, &strong), -19);
    }

    #[test]
    fn antisymmetric() {
        let a = board("2c 3d 4h", "7c 7d Kh Ks 2d", "9c 9d 9h 2s 2h");
        let b = board("Ac Ad 4s", "5c 5d Jh Js 3c", "Tc Jc Qc Kc 8c");
        let c = board("6c 7d 8h", "Ts Jd Qh Kd As", "2c 2d 3s 3d 3h");
        for (x, y) in [(&a, &b), (&b, &c), (&a, &c), (&a, &a)] {
            assert_eq!(
                Scorer::calculate_hand_score(x, y),
                -Scorer::calculate_hand_score(y, x)
            );
        }
        assert_eq!(Scorer::calculate_hand_score(&a, &a), 0);
    }

    #[test]
    fn split_lines_no_scoop() {
        let a = board("Ac Ad 4s", "7c 8d Jh Ks 2d", "9c 9d 9h 2s 2h");
        let b = board("2c 3d 4h", "5c 5d Jc Js 3c", "Tc Td Qc Kc 8c");
        // top won, middle lost, bottom won; royalties 3 + 6 against 0
        assert_eq!(Scorer::calculate_hand_score(&a, &b), 1 + 9);
    }

    #[test]
    fn fantasy_qualification() {
        let middle = "7c 7d Kh Ks 2d";
        let bottom = "9c 9d 9h 2s 2h";
        assert!(Scorer::is_fantasy_qualified(&board("Qc Qd Ks", middle, bottom)));
        assert!(!Scorer::is_fantasy_qualified(&board("Jc Jd Qs", middle, bottom)));
        assert!(!Scorer::is_fantasy_qualified(&board("Ac Ad As", middle, bottom)));
        assert!(!Scorer::is_fantasy_qualified(&board("Qc Qd", middle, bottom)));
    }
}
