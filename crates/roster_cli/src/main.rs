//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `roster_core` linkage.
//! - Drive the seeded-roster paged query path end to end.

use roster_core::db::open_db_in_memory;
use roster_core::{
    default_log_level, init_logging, MemberService, PageRequest, RegisterMemberRequest, Sort,
    SortKey, SqliteMemberRepository, SqliteTeamRepository, Team, TeamRepository,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = std::env::temp_dir().join("roster-cli-logs");
    if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        eprintln!("logging disabled: {err}");
    }

    println!("roster_core version={}", roster_core::core_version());

    let conn = open_db_in_memory()?;
    let teams = SqliteTeamRepository::try_new(&conn)?;
    let service = MemberService::new(SqliteMemberRepository::try_new(&conn)?);

    let team_a = Team::new("teamA");
    let team_b = Team::new("teamB");
    teams.save(&team_a)?;
    teams.save(&team_b)?;

    for (username, age, team_id) in [
        ("ana", 25, Some(team_a.id)),
        ("bruno", 25, Some(team_b.id)),
        ("carla", 25, Some(team_a.id)),
        ("duro", 25, None),
        ("edda", 31, Some(team_b.id)),
    ] {
        service.register_member(&RegisterMemberRequest {
            username: username.to_string(),
            age,
            team_id,
        })?;
    }

    let request = PageRequest::with_sort(0, 3, vec![Sort::desc(SortKey::Username)]);
    let page = service.members_of_age(25, &request)?;
    println!(
        "page {} of {} ({} members aged 25 in total)",
        page.number() + 1,
        page.total_pages(),
        page.total_elements()
    );
    for member in page.content() {
        println!("  {} ({})", member.username, member.age);
    }

    println!("roster summaries:");
    for summary in service.roster_summaries()? {
        println!("  {} -> {}", summary.username, summary.team_name);
    }

    Ok(())
}
