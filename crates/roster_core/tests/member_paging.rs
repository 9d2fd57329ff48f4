use roster_core::db::open_db_in_memory;
use roster_core::{
    Member, MemberRepository, PageRequest, Sort, SortKey, SqliteMemberRepository,
};

fn seed_five_members_aged_ten(repo: &SqliteMemberRepository<'_>) {
    for username in ["member1", "member2", "member3", "member4", "member5"] {
        repo.save(&Member::new(username, 10)).unwrap();
    }
}

#[test]
fn first_page_carries_slice_and_count_metadata() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed_five_members_aged_ten(&repo);

    let request = PageRequest::with_sort(0, 3, vec![Sort::desc(SortKey::Username)]);
    let page = repo.page_by_age(10, &request).unwrap();

    assert_eq!(page.content().len(), 3);
    assert_eq!(page.total_elements(), 5);
    assert_eq!(page.number(), 0);
    assert_eq!(page.total_pages(), 2);
    assert!(page.is_first());
    assert!(page.has_next());

    let usernames: Vec<_> = page.content().iter().map(|m| m.username.as_str()).collect();
    assert_eq!(usernames, ["member5", "member4", "member3"]);
}

#[test]
fn last_page_holds_the_remainder() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed_five_members_aged_ten(&repo);

    let request = PageRequest::with_sort(1, 3, vec![Sort::desc(SortKey::Username)]);
    let page = repo.page_by_age(10, &request).unwrap();

    assert_eq!(page.content().len(), 2);
    assert_eq!(page.total_elements(), 5);
    assert!(!page.has_next());
    assert!(page.is_last());
    assert!(page.has_previous());

    let usernames: Vec<_> = page.content().iter().map(|m| m.username.as_str()).collect();
    assert_eq!(usernames, ["member2", "member1"]);
}

#[test]
fn page_filters_by_age() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed_five_members_aged_ten(&repo);
    repo.save(&Member::new("elder", 60)).unwrap();

    let page = repo.page_by_age(10, &PageRequest::of(0, 10)).unwrap();
    assert_eq!(page.total_elements(), 5);
    assert!(page.content().iter().all(|m| m.age == 10));
}

#[test]
fn page_beyond_the_data_is_empty_but_keeps_totals() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed_five_members_aged_ten(&repo);

    let page = repo.page_by_age(10, &PageRequest::of(4, 3)).unwrap();
    assert!(page.content().is_empty());
    assert_eq!(page.total_elements(), 5);
    assert_eq!(page.total_pages(), 2);
    assert!(page.is_last());
}

#[test]
fn page_map_projects_content_without_touching_counts() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    seed_five_members_aged_ten(&repo);

    let request = PageRequest::with_sort(0, 3, vec![Sort::asc(SortKey::Username)]);
    let page = repo.page_by_age(10, &request).unwrap();

    let names = page.map(|member| member.username);
    assert_eq!(names.total_elements(), 5);
    assert_eq!(names.total_pages(), 2);
    assert_eq!(names.content(), &["member1", "member2", "member3"]);
}

#[test]
fn no_matches_yields_an_empty_first_page() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let page = repo.page_by_age(99, &PageRequest::of(0, 3)).unwrap();
    assert!(page.content().is_empty());
    assert_eq!(page.total_elements(), 0);
    assert_eq!(page.total_pages(), 0);
    assert!(page.is_first());
    assert!(page.is_last());
}
