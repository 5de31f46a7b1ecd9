//! Integration tests for the token-weighted ballot flow

use voteledger::crypto::Address;
use voteledger::encoding::parse_ether;
use voteledger::ledger::Ledger;

const PROPOSALS: [&str; 3] = ["Proposal 1", "Proposal 2", "Proposal 3"];

fn proposal_names() -> Vec<String> {
    PROPOSALS.iter().map(|s| s.to_string()).collect()
}

struct Setup {
    ledger: Ledger,
    deployer: Address,
    token: Address,
    ballot: Address,
    wallets: Vec<Address>,
}

/// Deploy the token and ballot, then mint 10 tokens to four wallets and
/// self-delegate each so the power is active.
fn deploy_and_mint() -> Result<Setup, Box<dyn std::error::Error>> {
    let mut ledger = Ledger::new()?;
    let deployer = ledger.signer(0)?;
    let (token, _) = ledger.deploy_token(deployer, "Vote Token", "VTK")?;
    let (ballot, _) = ledger.deploy_custom_ballot(deployer, &proposal_names(), token)?;

    let base_power = parse_ether("10")?;
    let mut wallets = Vec::new();
    for _ in 0..4 {
        let wallet = ledger.create_wallet()?;
        ledger.mint(deployer, token, wallet, base_power)?;
        ledger.delegate_votes(wallet, token, wallet)?;
        wallets.push(wallet);
    }

    Ok(Setup {
        ledger,
        deployer,
        token,
        ballot,
        wallets,
    })
}

#[test]
fn test_minted_power_is_inert_until_delegated() -> Result<(), Box<dyn std::error::Error>> {
    let mut setup = deploy_and_mint()?;
    let wallet = setup.ledger.create_wallet()?;
    setup
        .ledger
        .mint(setup.deployer, setup.token, wallet, parse_ether("10")?)?;

    assert_eq!(setup.ledger.get_votes(&setup.token, &wallet)?, 0);
    assert_eq!(setup.ledger.voting_power(&setup.ballot, &wallet)?, 0);

    setup.ledger.delegate_votes(wallet, setup.token, wallet)?;
    assert_eq!(
        setup.ledger.get_votes(&setup.token, &wallet)?,
        parse_ether("10")?
    );
    assert_eq!(
        setup.ledger.voting_power(&setup.ballot, &wallet)?,
        parse_ether("10")?
    );
    Ok(())
}

#[test]
fn test_undelegated_wallet_cannot_vote() -> Result<(), Box<dyn std::error::Error>> {
    let mut setup = deploy_and_mint()?;
    let wallet = setup.ledger.create_wallet()?;
    setup
        .ledger
        .mint(setup.deployer, setup.token, wallet, parse_ether("10")?)?;

    let err = setup
        .ledger
        .vote_with_power(wallet, setup.ballot, 0, 1)
        .unwrap_err();
    assert_eq!(err.to_string(), "Has not enough voting power");
    Ok(())
}

#[test]
fn test_vote_spends_part_of_the_power() -> Result<(), Box<dyn std::error::Error>> {
    let mut setup = deploy_and_mint()?;
    let wallet = setup.wallets[0];
    let used = parse_ether("5")?;

    setup.ledger.vote_with_power(wallet, setup.ballot, 0, used)?;

    let ballot = setup.ledger.custom_ballot(&setup.ballot)?;
    assert_eq!(ballot.spent_vote_power(&wallet), used);
    assert_eq!(ballot.proposal(0)?.vote_count, used);
    // Token votes are untouched; only ballot-side power is spent
    assert_eq!(
        setup.ledger.get_votes(&setup.token, &wallet)?,
        parse_ether("10")?
    );
    assert_eq!(setup.ledger.voting_power(&setup.ballot, &wallet)?, used);
    Ok(())
}

#[test]
fn test_cannot_overspend_voting_power() -> Result<(), Box<dyn std::error::Error>> {
    let mut setup = deploy_and_mint()?;
    let wallet = setup.wallets[0];

    setup
        .ledger
        .vote_with_power(wallet, setup.ballot, 0, parse_ether("8")?)?;
    let err = setup
        .ledger
        .vote_with_power(wallet, setup.ballot, 1, parse_ether("3")?)
        .unwrap_err();
    assert_eq!(err.to_string(), "Has not enough voting power");

    // The failed vote left no trace on the tally
    let ballot = setup.ledger.custom_ballot(&setup.ballot)?;
    assert_eq!(ballot.proposal(1)?.vote_count, 0);
    Ok(())
}

#[test]
fn test_four_wallet_scenario_winner() -> Result<(), Box<dyn std::error::Error>> {
    let mut setup = deploy_and_mint()?;
    let used = parse_ether("5")?;

    for (wallet, proposal) in setup.wallets.clone().into_iter().zip([0usize, 1, 2, 0]) {
        setup
            .ledger
            .vote_with_power(wallet, setup.ballot, proposal, used)?;
    }

    let ballot = setup.ledger.custom_ballot(&setup.ballot)?;
    assert_eq!(ballot.proposal(0)?.vote_count, parse_ether("10")?);
    assert_eq!(ballot.proposal(1)?.vote_count, used);
    assert_eq!(ballot.proposal(2)?.vote_count, used);
    assert_eq!(ballot.winning_proposal(), 0);
    assert_eq!(ballot.winner_name().parse()?, "Proposal 1");
    Ok(())
}

#[test]
fn test_voted_events_reach_the_listener() -> Result<(), Box<dyn std::error::Error>> {
    let mut setup = deploy_and_mint()?;
    let events = setup.ledger.subscribe_voted(Some(setup.ballot));
    let used = parse_ether("5")?;

    for (wallet, proposal) in setup.wallets.clone().into_iter().zip([0usize, 1, 2, 0]) {
        setup
            .ledger
            .vote_with_power(wallet, setup.ballot, proposal, used)?;
    }

    let logs: Vec<_> = events.try_iter().collect();
    assert_eq!(logs.len(), 4);
    for (log, wallet) in logs.iter().zip(&setup.wallets) {
        assert_eq!(log.contract, setup.ballot);
        assert_eq!(log.event.voter, *wallet);
        assert_eq!(log.event.amount, used);
    }
    // The last vote on proposal 0 sees the accumulated total
    assert_eq!(logs[3].event.proposal, 0);
    assert_eq!(logs[3].event.proposal_votes, parse_ether("10")?);
    Ok(())
}

#[test]
fn test_token_transfer_moves_voting_power() -> Result<(), Box<dyn std::error::Error>> {
    let mut setup = deploy_and_mint()?;
    let [from, to] = [setup.wallets[0], setup.wallets[1]];

    setup
        .ledger
        .transfer(from, setup.token, to, parse_ether("4")?)?;

    assert_eq!(
        setup.ledger.get_votes(&setup.token, &from)?,
        parse_ether("6")?
    );
    assert_eq!(
        setup.ledger.get_votes(&setup.token, &to)?,
        parse_ether("14")?
    );
    Ok(())
}
