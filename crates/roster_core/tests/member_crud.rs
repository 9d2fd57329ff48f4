use roster_core::db::open_db_in_memory;
use roster_core::{
    Member, MemberRepository, RepoError, SqliteMemberRepository, SqliteTeamRepository, Team,
    TeamRepository,
};
use uuid::Uuid;

#[test]
fn save_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let member = Member::new("memberA", 10);
    let id = repo.save(&member).unwrap();

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, member);
}

#[test]
fn basic_crud() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let member1 = Member::new("member1", 10);
    let member2 = Member::new("member2", 20);
    repo.save(&member1).unwrap();
    repo.save(&member2).unwrap();

    let found1 = repo.find_by_id(member1.id).unwrap().unwrap();
    let found2 = repo.find_by_id(member2.id).unwrap().unwrap();
    assert_eq!(found1, member1);
    assert_eq!(found2, member2);

    let all = repo.find_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(repo.count().unwrap(), 2);

    repo.delete_by_id(member1.id).unwrap();
    repo.delete_by_id(member2.id).unwrap();
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn save_is_an_upsert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let mut member = Member::new("memberA", 10);
    repo.save(&member).unwrap();

    member.username = "renamed".to_string();
    member.age = 11;
    repo.save(&member).unwrap();

    let loaded = repo.find_by_id(member.id).unwrap().unwrap();
    assert_eq!(loaded.username, "renamed");
    assert_eq!(loaded.age, 11);
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn find_by_id_returns_none_for_missing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_id(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn delete_missing_member_is_an_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let ghost = Uuid::new_v4();
    let err = repo.delete_by_id(ghost).unwrap_err();
    assert!(matches!(err, RepoError::MemberNotFound(id) if id == ghost));
}

#[test]
fn validation_failure_blocks_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let blank = Member::new("   ", 10);
    let err = repo.save(&blank).unwrap_err();
    assert!(matches!(err, RepoError::MemberValidation(_)));

    let negative = Member::new("memberA", -3);
    let err = repo.save(&negative).unwrap_err();
    assert!(matches!(err, RepoError::MemberValidation(_)));

    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn member_with_unknown_team_is_rejected_by_the_engine() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let mut member = Member::new("memberA", 10);
    member.join_team(Uuid::new_v4());

    let err = repo.save(&member).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn saved_team_association_survives_the_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let teams = SqliteTeamRepository::try_new(&conn).unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let team = Team::new("teamA");
    teams.save(&team).unwrap();

    let mut member = Member::new("memberA", 10);
    member.join_team(team.id);
    repo.save(&member).unwrap();

    let loaded = repo.find_by_id(member.id).unwrap().unwrap();
    assert_eq!(loaded.team_id, Some(team.id));

    let mut detached = loaded;
    detached.leave_team();
    repo.save(&detached).unwrap();
    let reloaded = repo.find_by_id(member.id).unwrap().unwrap();
    assert!(reloaded.team_id.is_none());
}
