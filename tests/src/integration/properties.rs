//! Lifecycle properties checked directly against the domain types.

use da_01_document_model::{
    new_document, CreatePayload, DocumentError, DocumentKind, DocumentModel, FieldKey, RoleKey,
    TransitionAction,
};
use da_02_signatures::{sign, verify_signature, IdentityConfig, SignatureError};
use da_03_anchoring::{LedgerError, SubmitterConfig, TransactionSubmitter, TxHandle};
use shared_types::{Deadline, Identity};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;

fn id(b: u8) -> Identity {
    Identity([b; 20])
}

fn draft(author: Identity, collaborators: &[Identity]) -> Box<dyn DocumentModel> {
    let payload = CreatePayload::new(DocumentKind::Invoice)
        .with_field("amount", "100")
        .with_collaborators(collaborators.iter().copied());
    new_document(author, &payload).unwrap()
}

#[test]
fn test_derived_versions_never_collide() {
    let first = draft(id(1), &[]);
    let second = first.derive_next_version();
    let third = second.derive_next_version();

    assert_eq!(second.id(), first.id());
    assert_eq!(second.current_version(), first.next_version());
    assert_eq!(third.current_version(), second.next_version());

    let versions: HashSet<_> = [&first, &second, &third]
        .iter()
        .flat_map(|d| [d.current_version(), d.next_version()])
        .collect();
    // Four distinct identifiers: each next becomes the following current.
    assert_eq!(versions.len(), 4);
}

#[test]
fn test_rule_for_missing_role_leaves_rules_untouched() {
    let mut doc = draft(id(1), &[]);
    doc.add_role("payers", &[id(1)]).unwrap();
    let before = doc.core().policy().rules().to_vec();

    let missing = RoleKey::from_label("auditors");
    let err = doc
        .add_transition_rule(&missing, FieldKey::named("amount"), TransitionAction::Edit)
        .unwrap_err();

    assert_eq!(err, DocumentError::RoleNotFound(missing));
    assert_eq!(doc.core().policy().rules(), before.as_slice());
}

#[test]
fn test_role_rule_restricts_collaborator() {
    let (a, b) = (id(1), id(2));
    let mut doc = draft(a, &[b]);
    let amount = FieldKey::named("amount");

    assert!(doc.authorize(&a, &amount, TransitionAction::Edit));
    assert!(doc.authorize(&b, &amount, TransitionAction::Edit));

    let payers = doc.add_role("payers", &[a]).unwrap();
    doc.add_transition_rule(&payers.key, amount.clone(), TransitionAction::Edit)
        .unwrap();

    assert!(doc.authorize(&a, &amount, TransitionAction::Edit));
    assert!(!doc.authorize(&b, &amount, TransitionAction::Edit));
}

#[test]
fn test_signature_round_trip_and_tamper() {
    let account = IdentityConfig::generate(id(7));
    let payload = b"signing root of version 1".to_vec();
    let signature = sign(&account, &payload);
    assert!(verify_signature(&signature, &payload).is_ok());

    for i in 0..payload.len() {
        let mut tampered = payload.clone();
        tampered[i] ^= 0x01;
        assert_eq!(
            verify_signature(&signature, &tampered),
            Err(SignatureError::InvalidSignature { signer: id(7) })
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_submitter_recovers_from_stale_nonce() {
    let interval = Duration::from_secs(2);
    let submitter = TransactionSubmitter::new(SubmitterConfig {
        max_retries: 5,
        retry_interval: interval,
    });
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let handle = submitter
        .submit(&Deadline::none(), "main", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(LedgerError::NonceTooLow)
                } else {
                    Ok(TxHandle {
                        tx_hash: [9; 32],
                        account: "main".into(),
                    })
                }
            }
        })
        .await
        .unwrap();

    assert_eq!(handle.tx_hash, [9; 32]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() >= interval * 2);
}
