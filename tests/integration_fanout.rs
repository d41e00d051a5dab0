//! Failure policies of the parallel fan-outs.

mod common;

use std::sync::Arc;

use common::{FakeSource, TeamPage, org_page, test_config};
use matchday::core::Error;
use matchday::extract::ResourceKind;
use matchday::league::{Loader, Team};
use matchday::newsletter::Newsletter;

#[tokio::test]
async fn a_failed_team_is_dropped_from_the_organization() {
    let source = Arc::new(FakeSource::new());
    source.insert_organization(1, org_page("HOME CLUB", &[11, 12, 13, 14, 15]));
    for id in [11, 12, 13, 14] {
        source.insert_team(id, TeamPage::new(&format!("Team {id}")).org(1).build());
    }
    // Team 15 stays unregistered and answers 404.

    let loader = Loader::new(source.clone(), &test_config());

    let org = loader.organization(1).await.unwrap();
    loader.load_teams(&org).await;

    let mut ids: Vec<u32> = org.teams().iter().map(|team| team.id()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![11, 12, 13, 14]);
}

#[tokio::test]
async fn a_match_with_an_unresolvable_opponent_is_omitted() {
    let source = Arc::new(FakeSource::new());
    source.insert_organization(5, org_page("HOME CLUB", &[]));
    source.insert_organization(6, org_page("RIVAL CLUB", &[]));
    source.insert_team(
        30,
        TeamPage::new("Home Team")
            .org(5)
            .row("04/12/25", "", 31, true, "")
            .row("04/19/25", "", 32, false, "")
            .build(),
    );
    source.insert_team(31, TeamPage::new("Rival Team").org(6).build());
    // Opponent 32 stays unregistered; its match must vanish entirely.

    let loader = Loader::new(source.clone(), &test_config());

    let team = loader.team(30).await.unwrap();
    loader.load_matches(&team).await.unwrap();

    assert_eq!(team.matches().len(), 1);
    assert_eq!(team.matches()[0].visiting_team().unwrap().id(), 31);
}

#[tokio::test]
async fn roster_match_failures_aggregate_without_discarding_loaded_teams() {
    let source = Arc::new(FakeSource::new());
    source.insert_organization(1, org_page("HOME CLUB", &[]));
    source.insert_organization(2, org_page("EASTSIDE TENNIS CLUB", &[]));
    source.insert_organization(3, org_page("OAKWOOD TENNIS CLUB", &[]));
    source.insert_team(
        11,
        TeamPage::new("Eastside A").org(2).row("04/12/25", "", 99, true, "Won 4-2").build(),
    );
    source.insert_team(
        12,
        TeamPage::new("Eastside B").org(2).row("04/13/25", "", 99, false, "Lost 2-4").build(),
    );
    // Team 13's club page is unreachable, so its match history cannot be
    // attributed and its load fails.
    source.insert_team(13, TeamPage::new("Orphan").org(4).build());
    source.insert_team(99, TeamPage::new("Oakwood A").org(3).build());

    let loader = Loader::new(source.clone(), &test_config());
    let mut newsletter = Newsletter::new(1, vec![11, 12, 13]);

    let err = newsletter.generate(&loader).await.unwrap_err();
    assert_eq!(err, Error::PartialLoad { failed: 1, total: 3 });
    assert!(err.to_string().contains("1 of 3"));

    // The graph keeps every roster team, and the two that loaded keep their
    // matches.
    let org = newsletter.organization().unwrap();
    assert_eq!(org.teams().len(), 3);

    let team = |id: u32| -> Arc<Team> {
        org.teams().into_iter().find(|team| team.id() == id).unwrap()
    };
    assert_eq!(team(11).matches().len(), 1);
    assert_eq!(team(12).matches().len(), 1);
    assert!(team(13).matches().is_empty());

    // Winner points follow the higher total; the winning side follows the verb.
    let won = team(11).matches()[0].clone();
    let outcome = won.outcome().unwrap();
    assert_eq!((outcome.winning_team, outcome.winner_points, outcome.loser_points), (11, 4, 2));

    let lost = team(12).matches()[0].clone();
    let outcome = lost.outcome().unwrap();
    assert_eq!((outcome.winning_team, outcome.winner_points, outcome.loser_points), (99, 4, 2));
}

#[tokio::test]
async fn a_failed_roster_team_is_reported_but_the_rest_survive() {
    let source = Arc::new(FakeSource::new());
    source.insert_organization(1, org_page("HOME CLUB", &[]));
    source.insert_organization(2, org_page("EASTSIDE TENNIS CLUB", &[]));
    source.insert_team(11, TeamPage::new("Eastside A").org(2).build());
    // Roster team 12 answers 404.

    let loader = Loader::new(source.clone(), &test_config());
    let mut newsletter = Newsletter::new(1, vec![11, 12]);

    let err = newsletter.generate(&loader).await.unwrap_err();
    assert_eq!(err, Error::PartialLoad { failed: 1, total: 2 });

    let org = newsletter.organization().unwrap();
    assert_eq!(org.teams().len(), 1);
    assert_eq!(org.teams()[0].id(), 11);
}

#[tokio::test]
async fn cancellation_stops_new_fetches() {
    let source = Arc::new(FakeSource::new());
    source.insert_organization(1, org_page("HOME CLUB", &[]));

    let loader = Loader::new(source.clone(), &test_config());
    loader.cancellation_token().cancel();

    let err = loader.organization(1).await.unwrap_err();
    assert_eq!(err, Error::Cancelled);
    assert_eq!(source.calls(ResourceKind::Organization, 1), 0);
}
