use itertools::Itertools;
use log::{debug, info};
use showdown_core::card::{Card, Rank, Suit};
use showdown_core::deck::DeckSeed;
use showdown_core::eval::{HandRank, ALL_HAND_CATEGORIES};
use showdown_core::sim::{AggregateStats, RoundOutcome, Simulator, TiePolicy};
use showdown_core::SeatIdx;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
/// Deal three five-card hands from one deck, rank them, and report the
/// showdown. With more than one round, report aggregate counts instead.
struct Opt {
    #[structopt(long, default_value = "1")]
    rounds: u64,
    #[structopt(
        long,
        help = "Base64 master seed for a reproducible run; random when omitted"
    )]
    seed: Option<DeckSeed>,
    #[structopt(
        long,
        default_value = "count-all",
        help = "How tied rounds credit the win counters (count-all or no-credit)"
    )]
    tie_policy: TiePolicy,
    #[structopt(
        long,
        parse(from_os_str),
        help = "Write the report to this file instead of stdout"
    )]
    out: Option<PathBuf>,
    #[structopt(long, help = "Emit the aggregate stats as JSON")]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let opt = Opt::from_args();
    let seed = opt.seed.unwrap_or_default();
    info!("master seed {}", seed);
    let mut sim = Simulator::seeded(seed, opt.tie_policy);

    let report = if opt.rounds == 1 && !opt.json {
        round_report(&sim.run_round()?)
    } else {
        sim.run_many(opt.rounds)?;
        debug!("finished {} rounds", opt.rounds);
        if opt.json {
            serde_json::to_string_pretty(sim.stats())?
        } else {
            stats_report(sim.stats(), opt.tie_policy)
        }
    };

    match opt.out {
        Some(path) => {
            fs::write(&path, report)?;
            info!("report written to {}", path.display());
        }
        None => println!("{}", report),
    }
    Ok(())
}

const DELIMITER: &str = "-<>-<>-<>-<>-<>-<>-<>-<>-";

/// Full single-round comparison, one block per hand.
fn round_report(round: &RoundOutcome) -> String {
    let outcome = round.outcome();
    let mut s = String::new();
    s.push_str(DELIMITER);
    s.push('\n');
    s.push_str(&win_statement(outcome.winners(), outcome.best()));
    s.push('\n');
    for (seat, hand) in round.hands().iter().enumerate() {
        let rank = &outcome.ranks()[seat];
        s.push_str(DELIMITER);
        s.push('\n');
        s.push_str(&format!("{} hand: {}\n", capitalize(ordinal(seat)), describe(rank)));
        if outcome.winners().contains(&seat) {
            if outcome.is_tie() {
                s.push_str("Hand included in the winning draw\n");
            } else {
                s.push_str("Winning hand\n");
            }
        }
        s.push_str("The hand includes the following cards:\n");
        for card in hand.sorted_desc() {
            s.push_str(&format!(" - {}\n", card_phrase(card)));
        }
    }
    s.push_str(DELIMITER);
    s.push('\n');
    s.push_str(&format!("Deck seed: {}\n", round.seed()));
    s
}

fn win_statement(winners: &[SeatIdx], best: &HandRank) -> String {
    if winners.len() == 1 {
        format!(
            "The {} hand wins with {}.",
            ordinal(winners[0]),
            describe(best)
        )
    } else {
        let names = winners.iter().map(|w| ordinal(*w)).collect::<Vec<_>>();
        format!(
            "Draw between the {} hands ({}).",
            join_words(&names),
            describe(best)
        )
    }
}

/// Aggregate table over a multi-round run.
fn stats_report(stats: &AggregateStats, policy: TiePolicy) -> String {
    let mut s = String::new();
    s.push_str(&format!("Rounds simulated: {}\n", stats.rounds()));
    s.push_str(&format!("Hands evaluated:  {}\n\n", stats.hands_evaluated()));
    s.push_str("Category            Count\n");
    for cat in ALL_HAND_CATEGORIES {
        s.push_str(&format!("{:<17} {:>8}\n", cat.to_string(), stats.category_count(cat)));
    }
    s.push('\n');
    s.push_str(&format!("Wins per player (ties {}):\n", policy));
    for seat in 0..showdown_core::NUM_SEATS {
        s.push_str(&format!(
            "Player {}: {:>8}\n",
            seat + 1,
            stats.win_count(seat)
        ));
    }
    s.push_str(&format!("Tied rounds: {}\n", stats.ties()));
    s
}

/// Human phrase for a rank: faces and the ace in words, the rest as digits.
fn rank_word(r: Rank, plural: bool) -> String {
    let s = match r {
        Rank::Ace => "Ace".to_string(),
        Rank::King => "King".to_string(),
        Rank::Queen => "Queen".to_string(),
        Rank::Jack => "Jack".to_string(),
        Rank::Ten => "10".to_string(),
        other => other.value().to_string(),
    };
    if plural {
        format!("{}s", s)
    } else {
        s
    }
}

fn suit_word(s: Suit) -> &'static str {
    match s {
        Suit::Club => "clubs",
        Suit::Diamond => "diamonds",
        Suit::Heart => "hearts",
        Suit::Spade => "spades",
    }
}

fn card_phrase(c: Card) -> String {
    format!("{} of {}", rank_word(c.rank(), false), suit_word(c.suit()))
}

fn ordinal(seat: SeatIdx) -> &'static str {
    match seat {
        0 => "first",
        1 => "second",
        2 => "third",
        _ => unreachable!("Only three seats at this table"),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join_words(words: &[&str]) -> String {
    match words.len() {
        0 | 1 => words.concat(),
        2 => format!("{} and {}", words[0], words[1]),
        _ => format!(
            "{} and {}",
            words[..words.len() - 1].iter().join(", "),
            words[words.len() - 1]
        ),
    }
}

/// Span of a straight, e.g. "9 to King"; the wheel reads "Ace to 5".
fn straight_span(high: Rank) -> String {
    if high == Rank::Five {
        return format!("Ace to {}", rank_word(Rank::Five, false));
    }
    let low = showdown_core::card::ALL_RANKS
        .iter()
        .find(|r| r.value() == high.value() - 4)
        .copied()
        .expect("Straight high cards run from 5 up");
    format!(
        "{} to {}",
        rank_word(low, false),
        rank_word(high, false)
    )
}

/// One-line description of a ranked hand, category plus its headline
/// tie-break values.
fn describe(rank: &HandRank) -> String {
    match *rank {
        HandRank::StraightFlush(high) => {
            if high == Rank::Ace {
                "a Royal Flush".to_string()
            } else {
                format!("a Straight Flush, {}", straight_span(high))
            }
        }
        HandRank::FourOfAKind(quad, kick) => format!(
            "Four of a Kind, {} ({} kicker)",
            rank_word(quad, true),
            rank_word(kick, false)
        ),
        HandRank::FullHouse(trip, pair) => format!(
            "a Full House, {} and {}",
            rank_word(trip, true),
            rank_word(pair, true)
        ),
        HandRank::Flush(ranks) => format!("a Flush, {} high", rank_word(ranks[0], false)),
        HandRank::Straight(high) => format!("a Straight, {}", straight_span(high)),
        HandRank::ThreeOfAKind(trip, kickers) => format!(
            "Three of a Kind, {} ({} kickers)",
            rank_word(trip, true),
            kickers.iter().map(|k| rank_word(*k, false)).join(", ")
        ),
        HandRank::TwoPair(hi, lo, kick) => format!(
            "Two Pair, {} and {} ({} kicker)",
            rank_word(hi, true),
            rank_word(lo, true),
            rank_word(kick, false)
        ),
        HandRank::OnePair(pair, kickers) => format!(
            "One Pair, {} ({} kickers)",
            rank_word(pair, true),
            kickers.iter().map(|k| rank_word(*k, false)).join(", ")
        ),
        HandRank::HighCard(ranks) => format!("{} high", rank_word(ranks[0], false)),
    }
}
