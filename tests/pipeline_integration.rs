//! End-to-end tests for the replay pipeline
//!
//! Scripted replays are driven through the adapter and the derived events
//! are collected from the output queue.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use replay_analytics::decoder::{MvpReason, RoundEndReason};
use replay_analytics::events::EventPayload;
use replay_analytics::state::{ClutchSituation, RoundType};
use replay_analytics::{
    create_event_channel_with_size, drain_events, CancellationFlag, ClutchStatus, EngineConfig,
    EngineError, EventType, GameEvent, JsonLinesSink, ReplayAdapter, TeamSide,
};
use std::io::Cursor;
use uuid::Uuid;

fn of_type(events: &[GameEvent], event_type: EventType) -> Vec<&GameEvent> {
    events.iter().filter(|e| e.event_type == event_type).collect()
}

// ============================================================================
// Two-round match
// ============================================================================

#[tokio::test]
async fn test_match_start_announces_round_count() {
    let script = two_round_clutch_match();
    let (result, events) = run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    result.unwrap();

    let starts = of_type(&events, EventType::MatchStart);
    assert_eq!(starts.len(), 1);
    match &starts[0].payload {
        EventPayload::MatchStart(payload) => {
            assert_eq!(payload.round_count, 2);
            assert_eq!(payload.header.map_name, MAP);
        }
        other => panic!("Expected MatchStart payload, got {:?}", other),
    }
}

#[tokio::test]
async fn test_single_clutch_lost_in_second_round() {
    let script = two_round_clutch_match();
    let (result, events) = run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    result.unwrap();

    let clutch_starts = of_type(&events, EventType::ClutchStart);
    let clutch_ends = of_type(&events, EventType::ClutchEnd);
    assert_eq!(clutch_starts.len(), 1);
    assert_eq!(clutch_ends.len(), 1);

    match &clutch_starts[0].payload {
        EventPayload::Clutch(payload) => {
            assert_eq!(payload.round_number, 2);
            assert_eq!(payload.status, ClutchStatus::ClutchInitiated);
            assert_eq!(payload.situation, Some(ClutchSituation::OneVsThree));
            assert_eq!(payload.network_player_id, Some(player(1, TeamSide::CounterTerrorists).network_player_id()));
        }
        other => panic!("Expected Clutch payload, got {:?}", other),
    }

    match &clutch_ends[0].payload {
        EventPayload::Clutch(payload) => {
            assert_eq!(payload.round_number, 2);
            assert_eq!(payload.status, ClutchStatus::ClutchLost);
            assert_eq!(payload.clutch_stats.status, ClutchStatus::ClutchLost);
        }
        other => panic!("Expected Clutch payload, got {:?}", other),
    }

    // The clutch end precedes the round end it resolves
    let end_position = events
        .iter()
        .position(|e| e.event_type == EventType::ClutchEnd)
        .unwrap();
    assert_eq!(events[end_position + 1].event_type, EventType::RoundEnd);
}

#[tokio::test]
async fn test_clutch_progress_on_clutcher_kill() {
    let script = two_round_clutch_match();
    let (result, events) = run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    result.unwrap();

    let progress = of_type(&events, EventType::ClutchProgress);
    assert_eq!(progress.len(), 1);
    match &progress[0].payload {
        EventPayload::Clutch(payload) => {
            assert_eq!(payload.status, ClutchStatus::ClutchProgress);
            // Situation keeps the opposition faced when the clutch began
            assert_eq!(payload.situation, Some(ClutchSituation::OneVsThree));
        }
        other => panic!("Expected Clutch payload, got {:?}", other),
    }
}

#[tokio::test]
async fn test_round_end_payloads() {
    let script = two_round_clutch_match();
    let (result, events) = run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    result.unwrap();

    let round_ends = of_type(&events, EventType::RoundEnd);
    assert_eq!(round_ends.len(), 2);

    let payloads: Vec<_> = round_ends
        .iter()
        .map(|e| match &e.payload {
            EventPayload::RoundEnd(payload) => payload.clone(),
            other => panic!("Expected RoundEnd payload, got {:?}", other),
        })
        .collect();

    assert_eq!(payloads[0].round_number, 1);
    assert_eq!(payloads[0].winner_side, TeamSide::CounterTerrorists);
    assert_eq!(payloads[0].round_stats.round_type, RoundType::Pistol);
    assert_eq!(payloads[0].round_stats.clutch_stats.status, ClutchStatus::NotInClutchSituation);

    assert_eq!(payloads[1].round_number, 2);
    assert_eq!(payloads[1].winner_side, TeamSide::Terrorists);
    assert_eq!(payloads[1].round_stats.round_type, RoundType::Last);
    assert!(payloads[1].winner_team_id.is_some());
    assert_eq!(payloads[1].round_stats.winner_team_id, payloads[1].winner_team_id);

    // Hit log totals of the second round
    let battle = round_ends[1].battle_stats().unwrap();
    assert_eq!(battle.round_number, 2);
    assert_eq!(battle.kill_count, 7);
    assert_eq!(battle.total_frags(), 7);
    let clutcher = battle.player(1).unwrap();
    assert_eq!(clutcher.frags, 2);
    assert!(clutcher.survived);
}

#[tokio::test]
async fn test_frags_carry_player_metadata() {
    let script = two_round_clutch_match();
    let (result, events) = run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    result.unwrap();

    let frags = of_type(&events, EventType::FragOrScore);
    assert_eq!(frags.len(), 11);

    for frag in &frags {
        let metadata: Vec<_> = frag.player_metadata().collect();
        assert_eq!(metadata.len(), 10);
        assert!(metadata.iter().all(|m| m.team_hash_id.is_some()));
        assert_eq!(frag.resource_owner, owner());
    }
}

#[tokio::test]
async fn test_round_mvp_announcement() {
    let mut script = ReplayScript::new();
    script
        .match_start(24)
        .round_start()
        .freezetime_end()
        .hurt(1, 11, 40)
        .kill(1, 11)
        .round_end(TeamSide::CounterTerrorists, RoundEndReason::TargetSaved)
        .mvp(1, MvpReason::MostEliminations);

    let (result, events) = run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    result.unwrap();

    let mvps = of_type(&events, EventType::RoundMvpAnnouncement);
    assert_eq!(mvps.len(), 1);
    match &mvps[0].payload {
        EventPayload::RoundMvp(payload) => {
            assert_eq!(payload.name, "player1");
            assert_eq!(payload.clan_name, "NAVI");
            assert_eq!(payload.reason, "Most Eliminations");
            assert_eq!(payload.player_stats.frags, 1);
            assert_eq!(payload.player_stats.total_damage, 40);
        }
        other => panic!("Expected RoundMvp payload, got {:?}", other),
    }

    let hits = of_type(&events, EventType::BattleHit);
    assert_eq!(hits.len(), 1);
    assert!(matches!(&hits[0].payload, EventPayload::BattleHit(hit) if hit.health_damage == 40));
}

#[tokio::test]
async fn test_halftime_swap_between_rounds() {
    let mut script = ReplayScript::new();
    script
        .match_start(2)
        .round_start()
        .freezetime_end()
        .kill(1, 11)
        .round_end(TeamSide::CounterTerrorists, RoundEndReason::TargetSaved)
        .mvp(1, MvpReason::MostEliminations);

    for p in script.state_mut().participants.iter_mut() {
        p.side = p.side.opponent().unwrap_or(p.side);
    }
    script
        .round_start()
        .freezetime_end()
        .round_end(TeamSide::CounterTerrorists, RoundEndReason::TargetSaved);

    let (result, events) = run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    let summary = result.unwrap();
    assert_eq!(summary.rounds, 2);

    let starts: Vec<_> = of_type(&events, EventType::RoundStart)
        .into_iter()
        .map(|e| match &e.payload {
            EventPayload::RoundStart(payload) => payload.clone(),
            other => panic!("Expected RoundStart payload, got {:?}", other),
        })
        .collect();
    assert_eq!(starts.len(), 2);
    assert_eq!(starts[1].team_ct, starts[0].team_t);
    assert_eq!(starts[1].team_t, starts[0].team_ct);

    // the announcement belongs to the round that just closed
    let mvp = of_type(&events, EventType::RoundMvpAnnouncement)[0];
    assert_eq!(mvp.battle_stats().unwrap().round_number, 1);
    let mvp_side = mvp.player_metadata().find(|m| m.user_id == 11).unwrap().side;
    assert_eq!(mvp_side, TeamSide::Terrorists);

    let second_end = of_type(&events, EventType::RoundEnd)[1];
    match &second_end.payload {
        EventPayload::RoundEnd(payload) => {
            assert_eq!(payload.round_number, 2);
            assert_eq!(payload.winner_team_id, starts[0].team_t);
        }
        other => panic!("Expected RoundEnd payload, got {:?}", other),
    }
    let swapped = second_end.player_metadata().find(|m| m.user_id == 11).unwrap();
    assert_eq!(swapped.side, TeamSide::CounterTerrorists);
    assert_eq!(swapped.team_hash_id, starts[1].team_ct);
}

// ============================================================================
// Invariants
// ============================================================================

#[tokio::test]
async fn test_stats_cover_every_round() {
    let script = two_round_clutch_match();
    let (result, events) = run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    let summary = result.unwrap();

    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.stats.rounds_stats.len(), summary.rounds);
    assert_eq!(summary.events_decoded, script.frames().len());
    assert_eq!(summary.events_emitted, events.len());
    assert_eq!(summary.stats.header.as_ref().map(|h| h.map_name.as_str()), Some(MAP));

    for (i, round) in summary.stats.rounds_stats.iter().enumerate() {
        assert_eq!(round.round_number, i + 1);
    }
}

#[tokio::test]
async fn test_replaying_twice_yields_same_events() {
    let script = two_round_clutch_match();
    let (first, first_events) =
        run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    let (second, second_events) =
        run_adapter(EngineConfig::default(), request(), script.decoder()).await;

    let shape = |events: &[GameEvent]| -> Vec<(EventType, i64, EventPayload)> {
        events
            .iter()
            .map(|e| (e.event_type, e.tick_id, e.payload.clone()))
            .collect()
    };
    assert_eq!(shape(&first_events), shape(&second_events));
    assert_eq!(first.unwrap().rounds, second.unwrap().rounds);
}

#[tokio::test]
async fn test_generic_events_are_never_published() {
    let mut script = two_round_clutch_match();
    script.generic("player_footstep").generic("bomb_beep");

    let (result, events) = run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    let summary = result.unwrap();

    assert!(of_type(&events, EventType::Generic).is_empty());
    assert_eq!(summary.events_decoded, script.frames().len());
}

#[tokio::test]
async fn test_world_kill_is_logged_but_not_published() {
    let mut script = ReplayScript::new();
    script
        .match_start(24)
        .round_start()
        .freezetime_end()
        .world_kill(3)
        .kill(11, 4);

    let (result, events) = run_adapter(EngineConfig::default(), request(), script.decoder()).await;
    result.unwrap();

    let frags = of_type(&events, EventType::FragOrScore);
    assert_eq!(frags.len(), 1);
    let battle = frags[0].battle_stats().unwrap();
    assert_eq!(battle.kill_count, 2);
    assert_eq!(battle.player(3).unwrap().deaths, 1);
}

// ============================================================================
// Failure paths
// ============================================================================

#[test_log::test(tokio::test)]
async fn test_decode_error_stops_emission_and_closes_queue() {
    let script = two_round_clutch_match();
    let decoder = script.decoder().with_failure_after(3);

    let (result, events) = run_adapter(EngineConfig::default(), request(), decoder).await;
    match result {
        Err(EngineError::Decode { line, .. }) => assert_eq!(line, 4),
        other => panic!("Expected decode error, got {:?}", other.map(|s| s.events_decoded)),
    }

    // MatchStart, RoundStart and FreezetimeEnd made it out before the failure
    let types: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        vec![EventType::MatchStart, EventType::RoundStart, EventType::RoundFreezetimeEnd]
    );
}

#[tokio::test]
async fn test_cancelled_request_publishes_nothing() {
    let script = two_round_clutch_match();
    let cancellation = CancellationFlag::new();
    cancellation.cancel();

    let (result, events) = run_adapter(
        EngineConfig::default(),
        request().with_cancellation(cancellation),
        script.decoder(),
    )
    .await;

    assert!(matches!(result, Err(EngineError::Cancelled)));
    assert!(events.is_empty());
}

// ============================================================================
// JSON-lines stream
// ============================================================================

#[tokio::test]
async fn test_json_lines_round_trip_through_sink() {
    let script = two_round_clutch_match();
    let input = Cursor::new(script.to_json_lines());

    let config = EngineConfig::default();
    let (tx, rx) = create_event_channel_with_size(config.pipeline.channel_size);
    let consumer = tokio::spawn(async move {
        let mut sink = JsonLinesSink::new(Vec::new());
        let written = drain_events(rx, &mut sink).await?;
        Ok::<_, EngineError>((written, sink.into_inner()))
    });

    let adapter = ReplayAdapter::new(config);
    let summary = adapter
        .parse_reader(&request(), Uuid::new_v4(), input, tx)
        .await
        .unwrap();
    let (written, output) = consumer.await.unwrap().unwrap();

    assert_eq!(written, summary.events_emitted);

    let lines: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), written);
    assert_eq!(lines[0]["type"], "MatchStart");
    assert_eq!(lines[0]["payload"]["data"]["round_count"], 2);

    let clutch_end = lines.iter().find(|l| l["type"] == "ClutchEnd").unwrap();
    assert_eq!(clutch_end["payload"]["data"]["status"], "ClutchLost");
    assert_eq!(clutch_end["payload"]["data"]["situation"], "1v3");
}

#[tokio::test]
async fn test_json_lines_bad_frame_reports_line() {
    let script = two_round_clutch_match();
    let mut input = script.to_json_lines();
    input.push_str("{\"not\": \"a frame\"}\n");

    let (tx, mut rx) = create_event_channel_with_size(256);
    let adapter = ReplayAdapter::new(EngineConfig::default());
    let err = adapter
        .parse_reader(&request(), Uuid::new_v4(), Cursor::new(input), tx)
        .await
        .unwrap_err();

    // Header line plus every scripted frame precede the bad line
    let expected_line = script.frames().len() + 2;
    assert!(matches!(err, EngineError::Decode { line, .. } if line == expected_line));

    let mut received = 0;
    while rx.recv().await.is_some() {
        received += 1;
    }
    assert!(received > 0);
}
