use roster_core::db::open_db_in_memory;
use roster_core::{Member, MemberRepository, RepoError, SqliteMemberRepository};
use rusqlite::TransactionBehavior;

#[test]
fn bulk_age_plus_updates_rows_at_or_above_threshold() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    for (username, age) in [
        ("member1", 10),
        ("member2", 19),
        ("member3", 20),
        ("member4", 21),
        ("member5", 40),
    ] {
        repo.save(&Member::new(username, age)).unwrap();
    }

    let changed = repo.bulk_age_plus(20).unwrap();
    assert_eq!(changed, 3);

    // No cached entity state exists, so the bulk write is immediately
    // visible to every subsequent read.
    let member5 = repo.find_unique_by_username("member5").unwrap().unwrap();
    assert_eq!(member5.age, 41);
    let member2 = repo.find_unique_by_username("member2").unwrap().unwrap();
    assert_eq!(member2.age, 19);
}

#[test]
fn bulk_age_plus_on_empty_table_updates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    assert_eq!(repo.bulk_age_plus(0).unwrap(), 0);
}

#[test]
fn lock_by_username_requires_an_enclosing_transaction() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    repo.save(&Member::new("memberA", 10)).unwrap();

    let err = repo.lock_by_username("memberA").unwrap_err();
    assert!(matches!(err, RepoError::LockRequiresTransaction));
}

#[test]
fn lock_by_username_returns_matching_rows_inside_a_transaction() {
    let mut conn = open_db_in_memory().unwrap();

    {
        let repo = SqliteMemberRepository::try_new(&conn).unwrap();
        repo.save(&Member::new("memberA", 10)).unwrap();
        repo.save(&Member::new("memberA", 20)).unwrap();
        repo.save(&Member::new("memberB", 30)).unwrap();
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .unwrap();
    {
        let repo = SqliteMemberRepository::try_new(&tx).unwrap();
        let locked = repo.lock_by_username("memberA").unwrap();
        assert_eq!(locked.len(), 2);
        assert!(locked.iter().all(|m| m.username == "memberA"));
    }
    tx.commit().unwrap();

    // Rows are intact after the locking transaction ends.
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count().unwrap(), 3);
}

#[test]
fn locked_rows_can_be_rewritten_in_the_same_transaction() {
    let mut conn = open_db_in_memory().unwrap();

    let member = Member::new("memberA", 10);
    {
        let repo = SqliteMemberRepository::try_new(&conn).unwrap();
        repo.save(&member).unwrap();
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .unwrap();
    {
        let repo = SqliteMemberRepository::try_new(&tx).unwrap();
        let mut locked = repo.lock_by_username("memberA").unwrap().remove(0);
        locked.age += 5;
        repo.save(&locked).unwrap();
    }
    tx.commit().unwrap();

    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let reloaded = repo.find_by_id(member.id).unwrap().unwrap();
    assert_eq!(reloaded.age, 15);
}
