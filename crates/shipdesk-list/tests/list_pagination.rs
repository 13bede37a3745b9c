mod common;

use common::{marks_list, visible_ids};
use shipdesk_list::{paginate, total_pages, ListError, PageLink};

#[test]
fn test_forty_five_records_make_three_pages() {
    let mut list = marks_list(45);
    assert_eq!(list.total_pages(), 3);

    assert_eq!(list.visible().len(), 20);
    list.go_to_page(2);
    assert_eq!(list.visible().len(), 20);
    list.go_to_page(3);
    assert_eq!(list.visible().len(), 5);
    assert_eq!(visible_ids(&list), vec!["41", "42", "43", "44", "45"]);
    assert_eq!(list.page_info().summary(), "Showing 41-45 of 45");
}

#[test]
fn test_pages_cover_every_item_once() {
    let mut list = marks_list(45);
    list.sort_by("name").unwrap();
    let expected: Vec<String> = list.filtered().map(|r| r.text("id").into_owned()).collect();

    let mut seen = Vec::new();
    for page in 1..=list.total_pages() {
        list.go_to_page(page);
        seen.extend(visible_ids(&list));
    }
    assert_eq!(seen, expected);
}

#[test]
fn test_total_pages_growth() {
    assert_eq!(total_pages(0, 20), 1);
    for n in 1..=20 {
        assert_eq!(total_pages(n, 20), 1);
    }
    assert_eq!(total_pages(21, 20), 2);
    assert_eq!(total_pages(40, 20), 2);
    assert_eq!(total_pages(41, 20), 3);

    let mut previous = total_pages(0, 20);
    for n in 1..=200 {
        let pages = total_pages(n, 20);
        let crossed = (n - 1) % 20 == 0 && n > 20;
        assert_eq!(pages, previous + usize::from(crossed), "n = {n}");
        previous = pages;
    }
}

#[test]
fn test_paginate_rejects_out_of_range() {
    let items: Vec<u32> = (0..45).collect();
    assert_eq!(paginate(&items, 3, 20).unwrap().items.len(), 5);
    assert_eq!(
        paginate(&items, 4, 20).unwrap_err(),
        ListError::PageOutOfRange {
            page: 4,
            total_pages: 3
        }
    );
    assert!(paginate(&items, 0, 20).is_err());
}

#[test]
fn test_controller_clamps_instead_of_wrapping() {
    let mut list = marks_list(45);
    assert_eq!(list.go_to_page(0), 1);
    assert_eq!(list.go_to_page(10), 3);

    list.set_search("Customer 4");
    // Customer 4 and 40..45
    assert_eq!(list.total_items(), 7);
    assert_eq!(list.page(), 1);
}

#[test]
fn test_empty_list_has_one_page() {
    let list = marks_list(0);
    assert_eq!(list.total_pages(), 1);
    assert!(list.visible().is_empty());
    assert_eq!(list.page_info().summary(), "Showing 0-0 of 0");
}

#[test]
fn test_view_window() {
    let mut list = marks_list(200);
    list.go_to_page(5);
    let view = list.view();
    assert_eq!(view.page.total_pages, 10);
    assert_eq!(
        view.window,
        vec![
            PageLink::Page(1),
            PageLink::Gap,
            PageLink::Page(4),
            PageLink::Page(5),
            PageLink::Page(6),
            PageLink::Gap,
            PageLink::Page(10),
        ]
    );
}
