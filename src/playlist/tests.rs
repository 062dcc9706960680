use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

fn tracks(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| Track::new(PathBuf::from(format!("/music/track{i:02}.mp3"))))
        .collect()
}

fn shuffled(n: usize, seed: u64) -> PlaylistCursor {
    let mut c = PlaylistCursor::new();
    c.load(tracks(n));
    c.shuffle_with(&mut StdRng::seed_from_u64(seed)).unwrap();
    c
}

#[test]
fn load_leaves_play_order_empty_until_shuffled() {
    let mut c = PlaylistCursor::new();
    c.load(tracks(3));
    assert_eq!(c.size(), 3);
    assert!(c.current().is_none());
    assert!(c.next().is_none());
    assert!(c.previous().is_none());
    assert_eq!(c.position(), None);
}

#[test]
fn shuffle_on_empty_playlist_fails() {
    let mut c = PlaylistCursor::new();
    assert_eq!(c.shuffle(), Err(CursorError::Empty));
    assert_eq!(c.restore_natural_order(), Err(CursorError::Empty));
}

#[test]
fn shuffle_is_a_permutation_of_the_natural_order() {
    let mut c = PlaylistCursor::new();
    c.load(tracks(25));
    let mut natural: Vec<Track> = c.natural().to_vec();
    natural.sort();

    for seed in 0..20 {
        c.shuffle_with(&mut StdRng::seed_from_u64(seed)).unwrap();
        let mut order: Vec<Track> = c.play_order().cloned().collect();
        order.sort();
        assert_eq!(order, natural);
        assert_eq!(c.position(), Some(0));
        assert_eq!(c.size(), 25);
    }

    c.shuffle().unwrap();
    let mut order: Vec<Track> = c.play_order().cloned().collect();
    order.sort();
    assert_eq!(order, natural);
}

#[test]
fn next_wraps_around_to_the_start() {
    let mut c = shuffled(5, 7);
    let start = c.current().cloned().unwrap();
    for _ in 0..4 {
        assert_ne!(c.next().cloned().unwrap(), start);
    }
    assert_eq!(c.next().cloned().unwrap(), start);
    assert_eq!(c.position(), Some(0));
}

#[test]
fn previous_wraps_around_to_the_end() {
    let mut c = shuffled(5, 11);
    let start = c.current().cloned().unwrap();
    let last = c.play_order().last().cloned().unwrap();
    assert_eq!(c.previous().cloned().unwrap(), last);
    assert_eq!(c.position(), Some(4));
    for _ in 0..4 {
        c.previous();
    }
    assert_eq!(c.current().cloned().unwrap(), start);
}

#[test]
fn single_track_playlist_wraps_onto_itself() {
    let mut c = shuffled(1, 0);
    let only = c.current().cloned().unwrap();
    assert_eq!(c.next().cloned().unwrap(), only);
    assert_eq!(c.previous().cloned().unwrap(), only);
}

#[test]
fn jump_to_sets_position_and_rejects_out_of_range() {
    let mut c = shuffled(4, 3);
    let third = c.play_order().nth(2).cloned().unwrap();
    assert_eq!(c.jump_to(2).cloned().unwrap(), third);
    assert_eq!(c.position(), Some(2));

    assert_eq!(
        c.jump_to(4).unwrap_err(),
        CursorError::IndexOutOfRange { index: 4, len: 4 }
    );
    assert_eq!(c.position(), Some(2));
}

#[test]
fn locate_finds_play_order_index_by_path() {
    let mut c = shuffled(6, 5);
    let target = c.play_order().nth(3).cloned().unwrap();
    assert_eq!(c.locate(&target.path), Some(3));
    assert_eq!(c.locate(std::path::Path::new("/music/missing.mp3")), None);

    let idx = c.locate(&target.path).unwrap();
    c.jump_to(idx).unwrap();
    assert_eq!(c.current(), Some(&target));
}

#[test]
fn restore_natural_order_keeps_current_track() {
    let mut c = shuffled(6, 9);
    c.jump_to(4).unwrap();
    let current = c.current().cloned().unwrap();

    c.restore_natural_order().unwrap();
    let order: Vec<Track> = c.play_order().cloned().collect();
    assert_eq!(order, c.natural().to_vec());
    assert_eq!(c.current().cloned().unwrap(), current);
}

#[test]
fn now_playing_reports_one_based_position() {
    let mut c = shuffled(3, 1);
    c.next();
    let np = c.now_playing().unwrap();
    assert_eq!(np.number, 2);
    assert_eq!(np.total, 3);
    assert_eq!(Some(&np.track), c.current());

    c.load(Vec::new());
    assert!(c.now_playing().is_none());
}
