use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::Error;

const DEFAULT_STRIDE: NonZeroUsize = NonZeroUsize::new(3).unwrap();

/// One slot of a rendered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEntry<P, A> {
    Post(P),
    Ad(A),
}

/// How often sponsored entries are placed between posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Insert the next unused ad after every `n`-th post.
    Every(NonZeroUsize),
    /// Never interleave. Ads can still be shown as the hero.
    Off,
}

impl Cadence {
    pub fn every(stride: usize) -> Result<Self, Error> {
        NonZeroUsize::new(stride)
            .map(Cadence::Every)
            .ok_or_else(|| Error::InvalidStride(stride.to_string()))
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::Every(DEFAULT_STRIDE)
    }
}

impl FromStr for Cadence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("off") || s.eq_ignore_ascii_case("none") {
            return Ok(Cadence::Off);
        }
        match s.parse::<usize>() {
            Ok(n) => Cadence::every(n),
            Err(_) => Err(Error::InvalidStride(s.to_string())),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Every(n) => write!(f, "{n}"),
            Cadence::Off => f.write_str("off"),
        }
    }
}

/// The ad shown outside the feed, if any ads are available at all.
pub fn hero<A>(ads: &[A]) -> Option<&A> {
    ads.first()
}

/// Interleave `ads` into `posts`.
///
/// Both inputs must already be filtered and ordered; entries are passed
/// through untouched. With fewer than two ads the posts come back unchanged,
/// otherwise `ads[0]` is left for the hero slot and `ads[1..]` are placed after
/// every stride-th post until they run out.
pub fn compose<'a, P, A>(
    posts: &'a [P],
    ads: &'a [A],
    cadence: Cadence,
) -> Vec<FeedEntry<&'a P, &'a A>> {
    let stride = match cadence {
        Cadence::Every(n) if ads.len() >= 2 => n.get(),
        _ => return posts.iter().map(FeedEntry::Post).collect(),
    };

    let mut in_feed = ads[1..].iter();
    let mut out = Vec::with_capacity(posts.len() + (posts.len() / stride).min(ads.len() - 1));
    for (i, post) in posts.iter().enumerate() {
        out.push(FeedEntry::Post(post));
        if (i + 1) % stride == 0
            && let Some(ad) = in_feed.next()
        {
            out.push(FeedEntry::Ad(ad));
        }
    }
    out
}

/// Hero placement plus the interleaved feed for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arranged<'a, P, A> {
    pub hero: Option<&'a A>,
    pub entries: Vec<FeedEntry<&'a P, &'a A>>,
}

pub fn arrange<'a, P, A>(posts: &'a [P], ads: &'a [A], cadence: Cadence) -> Arranged<'a, P, A> {
    Arranged {
        hero: hero(ads),
        entries: compose(posts, ads, cadence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Post {
        id: u32,
        published: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Ad {
        id: u32,
        active: bool,
    }

    fn posts(n: u32) -> Vec<Post> {
        (1..=n)
            .map(|id| Post {
                id,
                published: true,
            })
            .collect()
    }

    fn ads(n: u32) -> Vec<Ad> {
        (1..=n).map(|id| Ad { id: 100 + id, active: true }).collect()
    }

    fn every(n: usize) -> Cadence {
        Cadence::every(n).unwrap()
    }

    fn ad_of<'a>(entry: &FeedEntry<&Post, &'a Ad>) -> Option<&'a Ad> {
        match entry {
            FeedEntry::Ad(a) => Some(*a),
            FeedEntry::Post(_) => None,
        }
    }

    fn shape(entries: &[FeedEntry<&Post, &Ad>]) -> Vec<String> {
        entries
            .iter()
            .map(|e| match e {
                FeedEntry::Post(p) => format!("p{}", p.id),
                FeedEntry::Ad(a) => format!("a{}", a.id),
            })
            .collect()
    }

    #[test]
    fn test_no_ads_passes_posts_through() {
        let p = posts(5);
        let out = compose(&p, &[] as &[Ad], every(3));
        let expected: Vec<FeedEntry<&Post, &Ad>> = p.iter().map(FeedEntry::Post).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_single_ad_is_not_interleaved() {
        let p = posts(7);
        let a = ads(1);
        let out = compose(&p, &a, every(3));
        assert_eq!(out.len(), 7);
        assert!(out.iter().all(|e| ad_of(e).is_none()));
    }

    #[test]
    fn test_single_ad_still_becomes_hero() {
        let p = posts(2);
        let a = ads(1);
        let arranged = arrange(&p, &a, every(3));
        assert_eq!(arranged.hero, Some(&a[0]));
        assert_eq!(arranged.entries.len(), 2);
    }

    #[test]
    fn test_seven_posts_four_ads_stride_three() {
        let p = posts(7);
        let a = ads(4);
        let out = compose(&p, &a, every(3));

        assert_eq!(out.len(), 9);
        assert_eq!(
            shape(&out),
            vec!["p1", "p2", "p3", "a102", "p4", "p5", "p6", "a103", "p7"]
        );
        // 1-indexed positions 4 and 8
        assert_eq!(ad_of(&out[3]), Some(&a[1]));
        assert_eq!(ad_of(&out[7]), Some(&a[2]));
    }

    #[test]
    fn test_hero_is_excluded_from_feed() {
        let p = posts(9);
        let a = ads(3);
        let arranged = arrange(&p, &a, every(3));
        assert_eq!(arranged.hero.map(|h| h.id), Some(101));
        assert!(
            arranged
                .entries
                .iter()
                .filter_map(ad_of)
                .all(|ad| ad.id != 101)
        );
    }

    #[test]
    fn test_ads_do_not_cycle_once_exhausted() {
        let p = posts(12);
        let a = ads(2);
        let out = compose(&p, &a, every(3));
        assert_eq!(out.iter().filter_map(ad_of).count(), 1);
        assert_eq!(out.len(), 13);
        assert_eq!(shape(&out)[3], "a102");
    }

    #[test]
    fn test_no_trailing_ad_when_posts_end_before_stride() {
        let p = posts(2);
        let a = ads(3);
        let out = compose(&p, &a, every(3));
        assert_eq!(shape(&out), vec!["p1", "p2"]);
    }

    #[test]
    fn test_ad_follows_last_post_on_exact_multiple() {
        let p = posts(3);
        let a = ads(2);
        let out = compose(&p, &a, every(3));
        assert_eq!(shape(&out), vec!["p1", "p2", "p3", "a102"]);
    }

    #[test]
    fn test_stride_one() {
        let p = posts(3);
        let a = ads(3);
        let out = compose(&p, &a, every(1));
        assert_eq!(shape(&out), vec!["p1", "a102", "p2", "a103", "p3"]);
    }

    #[test]
    fn test_empty_posts_yield_empty_feed() {
        let p: Vec<Post> = vec![];
        let a = ads(4);
        assert!(compose(&p, &a, every(3)).is_empty());
    }

    #[test]
    fn test_cadence_off_never_interleaves() {
        let p = posts(9);
        let a = ads(5);
        let arranged = arrange(&p, &a, Cadence::Off);
        assert_eq!(arranged.entries.len(), 9);
        assert_eq!(arranged.hero.map(|h| h.id), Some(101));
    }

    #[test]
    fn test_composer_does_not_filter() {
        let p = vec![
            Post {
                id: 1,
                published: false,
            },
            Post {
                id: 2,
                published: true,
            },
            Post {
                id: 3,
                published: false,
            },
        ];
        let a = vec![
            Ad {
                id: 10,
                active: false,
            },
            Ad {
                id: 11,
                active: false,
            },
        ];
        let out = compose(&p, &a, every(3));
        assert_eq!(out.len(), 4);
        assert!(matches!(out[0], FeedEntry::Post(Post { published: false, .. })));
        assert!(!ad_of(&out[3]).unwrap().active);
    }

    #[test]
    fn test_ad_order_is_preserved() {
        let p = posts(9);
        let a = vec![
            Ad { id: 5, active: true },
            Ad { id: 3, active: true },
            Ad { id: 3, active: true },
            Ad { id: 1, active: true },
        ];
        let out = compose(&p, &a, every(3));
        let ids: Vec<u32> = out.iter().filter_map(ad_of).map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 3, 1]);
    }

    #[test]
    fn test_compose_is_idempotent() {
        let p = posts(10);
        let a = ads(4);
        let first = compose(&p, &a, every(3));
        let second = compose(&p, &a, every(3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_stride_is_rejected() {
        assert_eq!(Cadence::every(0), Err(Error::InvalidStride("0".into())));
    }

    #[test]
    fn test_parse_cadence() {
        assert_eq!("3".parse::<Cadence>(), Ok(every(3)));
        assert_eq!(" 5 ".parse::<Cadence>(), Ok(every(5)));
        assert_eq!("off".parse::<Cadence>(), Ok(Cadence::Off));
        assert_eq!("None".parse::<Cadence>(), Ok(Cadence::Off));
        assert!("0".parse::<Cadence>().is_err());
        assert!("-2".parse::<Cadence>().is_err());
        assert!("three".parse::<Cadence>().is_err());
    }

    #[test]
    fn test_cadence_display_roundtrips() {
        for c in [every(4), Cadence::Off, Cadence::default()] {
            assert_eq!(c.to_string().parse::<Cadence>(), Ok(c));
        }
    }

    #[test]
    fn test_default_cadence_is_three() {
        assert_eq!(Cadence::default(), every(3));
    }
}
