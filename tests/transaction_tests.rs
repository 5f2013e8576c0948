//! Transaction and spend-condition tests through the public API

use minichain::transaction::apply_transaction;
use minichain::*;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

fn fund(outputs: Vec<Output>) -> (Transaction, UtxoSet) {
    let funding = Transaction::coinbase(outputs, None);
    let utxo_set = apply_transaction(&funding, UtxoSet::new());
    (funding, utxo_set)
}

fn sign(secret: &SecretKey, message: &[u8]) -> Vec<u8> {
    let secp = Secp256k1::new();
    let digest = hash_to_bytes(&encoding::sha256(message));
    let msg = Message::from_digest_slice(&digest).unwrap();
    secp.sign_ecdsa(&msg, secret).serialize_der().to_vec()
}

#[test]
fn test_signature_locked_output() {
    let secp = Secp256k1::new();
    let owner = SecretKey::from_slice(&[7u8; 32]).unwrap();
    let thief = SecretKey::from_slice(&[9u8; 32]).unwrap();
    let owner_pub = PublicKey::from_secret_key(&secp, &owner);

    let (funding, utxo_set) = fund(vec![Output::new(SignatureCheck(owner_pub), 40)]);
    let message = b"pay bob 40".to_vec();

    let honest = Transaction::spend(
        vec![Input::new(
            funding.hash(),
            0,
            vec![Arg::Bytes(message.clone()), Arg::Bytes(sign(&owner, &message))],
        )],
        vec![Output::unlocked(40)],
    );
    assert!(honest.validate(&utxo_set));

    let forged = Transaction::spend(
        vec![Input::new(
            funding.hash(),
            0,
            vec![Arg::Bytes(message.clone()), Arg::Bytes(sign(&thief, &message))],
        )],
        vec![Output::unlocked(40)],
    );
    assert!(!forged.validate(&utxo_set));
}

#[test]
fn test_custom_closure_condition() {
    let even_count = FnCondition::new("even-arg-count", |args: &[Arg]| Ok(args.len() % 2 == 0));
    let (funding, utxo_set) = fund(vec![Output::new(even_count, 5)]);

    let ok = Transaction::spend(
        vec![Input::new(funding.hash(), 0, vec![Arg::Int(1), Arg::Int(2)])],
        vec![Output::unlocked(5)],
    );
    let odd = Transaction::spend(
        vec![Input::new(funding.hash(), 0, vec![Arg::Int(1)])],
        vec![Output::unlocked(5)],
    );
    assert!(ok.validate(&utxo_set));
    assert!(!odd.validate(&utxo_set));
}

#[test]
fn test_condition_identity_changes_transaction_hash() {
    let a = Transaction::coinbase(vec![Output::new(SumEquals(100), 1)], None);
    let b = Transaction::coinbase(vec![Output::new(SumEquals(99), 1)], None);
    let c = Transaction::coinbase(
        vec![Output::new(FnCondition::new("sum-100", |_args: &[Arg]| Ok(true)), 1)],
        None,
    );
    assert_ne!(a.hash(), b.hash());
    assert_ne!(a.hash(), c.hash());
}

#[test]
fn test_satisfier_changes_transaction_hash() {
    let prior = Hash256::from(1u64);
    let a = Transaction::spend(vec![Input::new(prior, 0, vec![Arg::Int(1)])], vec![]);
    let b = Transaction::spend(vec![Input::new(prior, 0, vec![Arg::Int(2)])], vec![]);
    let c = Transaction::spend(vec![Input::new(prior, 1, vec![Arg::Int(1)])], vec![]);
    assert_ne!(a.hash(), b.hash());
    assert_ne!(a.hash(), c.hash());
}

#[test]
fn test_spend_of_multiple_outputs_sums_inputs() {
    let (funding, utxo_set) = fund(vec![
        Output::unlocked(30),
        Output::new(AlwaysSpendable, 30),
        Output::new(HashLock::from_preimage(b"pw"), 40),
    ]);
    let tx = Transaction::spend(
        vec![
            Input::new(funding.hash(), 0, vec![]),
            Input::new(funding.hash(), 1, vec![]),
            Input::new(funding.hash(), 2, vec![Arg::Bytes(b"pw".to_vec())]),
        ],
        vec![Output::unlocked(100)],
    );
    assert_eq!(tx.check_inputs(&utxo_set), Ok(100));

    let greedy = Transaction::spend(
        vec![
            Input::new(funding.hash(), 0, vec![]),
            Input::new(funding.hash(), 1, vec![]),
        ],
        vec![Output::unlocked(61)],
    );
    assert_eq!(
        greedy.check_inputs(&utxo_set),
        Err(ConsensusError::Conservation { inputs: 60, outputs: 61 })
    );
}

#[test]
fn test_spend_with_no_outputs_burns_everything() {
    let (funding, utxo_set) = fund(vec![Output::unlocked(30)]);
    let burn = Transaction::spend(vec![Input::new(funding.hash(), 0, vec![])], vec![]);
    assert!(burn.validate(&utxo_set));
    let after = apply_transaction(&burn, utxo_set);
    assert!(after.is_empty());
}

#[test]
fn test_merkle_commitment_over_transactions() {
    let txs: Vec<Transaction> = (0..3u8)
        .map(|i| Transaction::coinbase(vec![Output::unlocked(1)], Some(vec![i])))
        .collect();
    let tree = MerkleTree::new(txs.clone());
    for (i, tx) in txs.iter().enumerate() {
        assert!(tree.proof(i).unwrap().verify(tx.hash(), tree.root()));
    }

    let mut reordered = txs.clone();
    reordered.swap(0, 2);
    assert_ne!(MerkleTree::new(reordered).root(), tree.root());
}
