use super::StaticPage;
use crate::domain::models::AttributeMutation;
use crate::domain::models::HostPage;
use crate::domain::models::MutationTarget;

#[test]
fn it_reports_style_and_class_mutations() {
    let page = StaticPage::new("https://cses.fi/problemset/task/1068", "rgb(255, 255, 255)");
    let mut rx = page.observe();

    page.set_background_color("rgb(0, 0, 0)");
    page.add_class(MutationTarget::Root, "dark");
    page.touch_attribute(MutationTarget::Body, "data-theme");

    assert_eq!(
        rx.try_recv().unwrap(),
        AttributeMutation::new(MutationTarget::Body, "style")
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        AttributeMutation::new(MutationTarget::Root, "class")
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        AttributeMutation::new(MutationTarget::Body, "data-theme")
    );

    let style = page.style();
    assert_eq!(style.background_color, "rgb(0, 0, 0)");
    assert_eq!(style.root_classes, vec!["dark".to_string()]);
}

#[test]
fn it_does_not_duplicate_classes() {
    let page = StaticPage::new("https://cses.fi/problemset/task/1068", "");
    page.add_class(MutationTarget::Body, "dark-theme");
    page.add_class(MutationTarget::Body, "dark-theme");
    assert_eq!(page.style().body_classes.len(), 1);

    page.remove_class(MutationTarget::Body, "dark-theme");
    assert!(page.style().body_classes.is_empty());
}

#[test]
fn it_can_lack_an_editor_container() {
    let page = StaticPage::new("https://cses.fi/problemset/task/1068", "");
    assert!(page.has_editor_container());
    assert!(!page.without_editor_container().has_editor_container());
}
