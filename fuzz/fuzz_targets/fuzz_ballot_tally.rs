#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use oracle_crypto::val_address_from_key;
use oracle_engine::tally::tally;
use oracle_engine::{Claim, ClaimMap, ExchangeRateBallot, VoteForTally};
use oracle_types::Dec;

#[derive(Debug, Arbitrary)]
struct FuzzVote {
    rate: i64,
    power: u16,
}

#[derive(Debug, Arbitrary)]
struct FuzzBallot {
    votes: Vec<FuzzVote>,
    reward_band_bps: u16,
}

fuzz_target!(|input: FuzzBallot| {
    let mut claims = ClaimMap::new();
    let mut ballot = ExchangeRateBallot::default();
    for (i, vote) in input.votes.iter().take(200).enumerate() {
        let voter = val_address_from_key(&[(i % 256) as u8; 20]);
        claims.insert(voter.clone(), Claim::new(voter.clone(), vote.power as u64));
        let rate = Dec::from_int(vote.rate);
        let power = if rate.is_positive() { vote.power as u64 } else { 0 };
        ballot.push(VoteForTally::new(voter, "uusd", rate, power));
    }
    ballot.sort();

    let band = Dec::with_prec((input.reward_band_bps % 10_001) as i64, 4);
    let median = tally(&mut ballot, band, &mut claims);

    if ballot.power() == 0 {
        assert_eq!(median, Dec::ZERO);
    }
    for claim in claims.values() {
        assert!(claim.win_count <= 1);
    }
});
