use std::sync::Arc;

use netview_core::{RankSet, ViewOptions};

#[test]
fn defaults_show_everything_but_individual_ranks() {
    let options = ViewOptions::default();
    assert!(!options.show_all_ranks());
    assert!(options.show_global());
    assert!(options.show_vertices());
    assert!(options.show_numbering());
    assert!(options.view_ranks().is_none());
}

#[test]
fn rank_set_is_shared_with_the_caller() {
    let ranks = Arc::new(RankSet::from_ranks([2, 0, 2]));
    let mut options = ViewOptions::default();
    options.set_view_ranks(Arc::clone(&ranks));
    assert_eq!(Arc::strong_count(&ranks), 2);
    assert_eq!(options.view_ranks().map(|set| set.as_slice()), Some(&[0, 2][..]));

    options.set_view_ranks(Arc::new(RankSet::from_ranks([1])));
    assert_eq!(Arc::strong_count(&ranks), 1);
}

#[test]
fn rank_set_renders_without_spaces() {
    assert_eq!(RankSet::from_ranks([3, 1, 10]).to_string(), "1,3,10");
    assert_eq!(RankSet::default().to_string(), "");
}
