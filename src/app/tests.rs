use super::*;

#[test]
fn first_frame_is_dirty_then_cleared() {
    let app = App::new(true);
    assert!(app.take_dirty());
    assert!(!app.take_dirty());
}

#[test]
fn redraw_handle_shares_the_flag() {
    let app = App::new(true);
    app.take_dirty();

    let handle = app.redraw_handle();
    handle.set(true);

    assert!(app.take_dirty());
}

#[test]
fn next_and_prev_wrap_around() {
    let mut app = App::new(false);
    app.prev(3);
    assert_eq!(app.selected, 2);
    app.next(3);
    assert_eq!(app.selected, 0);
    app.next(3);
    assert_eq!(app.selected, 1);

    app.next(0);
    app.prev(0);
    assert_eq!(app.selected, 1);
}

#[test]
fn follow_tracks_queue_cursor_only_when_enabled() {
    let mut app = App::new(true);
    app.follow(Some(4));
    assert_eq!(app.selected, 4);
    app.follow(None);
    assert_eq!(app.selected, 4);

    app.follow_playback_off();
    app.follow(Some(1));
    assert_eq!(app.selected, 4);

    app.follow_playback_on();
    app.follow(Some(1));
    assert_eq!(app.selected, 1);
}

#[test]
fn clamp_selection_after_queue_shrinks() {
    let mut app = App::new(false);
    app.selected = 7;
    app.clamp_selection(3);
    assert_eq!(app.selected, 2);
    app.clamp_selection(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn metadata_window_toggles() {
    let mut app = App::new(true);
    app.toggle_metadata_window();
    assert!(app.metadata_window);
    app.toggle_metadata_window();
    assert!(!app.metadata_window);
}
