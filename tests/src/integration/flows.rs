//! # Lifecycle Flows
//!
//! Pending documents created, edited and committed through the node's
//! `PendingService`, with collaborators signing over the in-memory
//! transport and anchors landing on the mock ledger.

use super::harness::TestNetwork;
use da_01_document_model::{
    CreatePayload, DocumentError, DocumentKind, DocumentStatus, FieldKey, TransitionAction, UpdatePayload,
};
use da_02_signatures::{IdentityConfig, SignatureError};
use da_03_anchoring::{AnchorError, CommittedDocumentStore, LedgerError};
use da_04_pending::{PendingDocumentApi, PendingError, RuleRequest};
use std::sync::Arc;
use std::time::Duration;

fn invoice(amount: &str) -> CreatePayload {
    CreatePayload::new(DocumentKind::Invoice).with_field("amount", amount)
}

#[tokio::test]
async fn test_commit_twice_returns_not_found() {
    let net = TestNetwork::start().await;
    let alice = net.join(1, "alice");
    let ctx = net.ctx(&alice);

    let created = net
        .node
        .pending
        .create(&ctx, &UpdatePayload::new_document(invoice("10")))
        .await
        .unwrap();
    let receipt = net.node.pending.commit(&ctx, &created.id()).await.unwrap();
    assert_eq!(receipt.document.status(), DocumentStatus::Anchored);

    let err = net.node.pending.commit(&ctx, &created.id()).await.unwrap_err();
    assert_eq!(err, PendingError::DocumentNotFound(created.id()));
    assert_eq!(net.ledger.anchors().len(), 1);
}

#[tokio::test]
async fn test_racing_commits_anchor_once() {
    let net = TestNetwork::start().await;
    let alice = net.join(1, "alice");
    let bob = net.join(2, "bob");
    let ctx = net.ctx(&alice);
    net.ledger.set_latency(Duration::from_millis(50));

    let payload = UpdatePayload::new_document(invoice("75").with_collaborators([bob.identity]));
    let created = net.node.pending.create(&ctx, &payload).await.unwrap();
    let created_id = created.id();
    let (a, b) = tokio::join!(
        net.node.pending.commit(&ctx, &created_id),
        net.node.pending.commit(&ctx, &created_id)
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| r.as_ref().err() == Some(&PendingError::DocumentNotFound(created.id()))));
    assert_eq!(net.ledger.anchors().len(), 1);

    let anchored = net
        .node
        .pending
        .get(&ctx, &created.id(), DocumentStatus::Anchored)
        .await
        .unwrap();
    assert_eq!(anchored.core().signatures().len(), 2);
}

#[tokio::test]
async fn test_collaborator_cosigns_and_receives_anchor() {
    let net = TestNetwork::start().await;
    let alice = net.join(1, "alice");
    let bob = net.join(2, "bob");
    let ctx = net.ctx(&alice);

    let payload = UpdatePayload::new_document(invoice("99").with_collaborators([bob.identity]));
    let created = net.node.pending.create(&ctx, &payload).await.unwrap();
    let receipt = net.node.pending.commit(&ctx, &created.id()).await.unwrap();

    let signers: Vec<_> = receipt
        .document
        .core()
        .signatures()
        .iter()
        .map(|s| s.signer)
        .collect();
    assert_eq!(signers.len(), 2);
    assert!(signers.contains(&alice.identity));
    assert!(signers.contains(&bob.identity));
    assert!(receipt.document.core().document_root().is_some());

    let delivered = net.node.transport.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "bob");
    assert_eq!(delivered[0].1.sender, alice.identity);
    assert_eq!(
        delivered[0].1.document.current_version(),
        created.current_version()
    );
}

#[tokio::test]
async fn test_unreachable_cosigner_aborts_commit() {
    let net = TestNetwork::start().await;
    let alice = net.join(1, "alice");
    let bob = net.join(2, "bob");
    let ctx = net.ctx(&alice);

    let payload = UpdatePayload::new_document(invoice("5").with_collaborators([bob.identity]));
    let created = net.node.pending.create(&ctx, &payload).await.unwrap();

    net.node.transport.set_unreachable("bob");
    let err = net.node.pending.commit(&ctx, &created.id()).await.unwrap_err();
    assert!(matches!(err, PendingError::Anchor(AnchorError::Transport(_))));
    assert!(net.ledger.anchors().is_empty());

    // The failed commit left the pending record in place.
    let still_pending = net
        .node
        .pending
        .get(&ctx, &created.id(), DocumentStatus::Pending)
        .await
        .unwrap();
    assert_eq!(still_pending.status(), DocumentStatus::Pending);
}

#[tokio::test]
async fn test_next_version_chains_from_anchored() {
    let net = TestNetwork::start().await;
    let alice = net.join(1, "alice");
    let ctx = net.ctx(&alice);

    let first = net
        .node
        .pending
        .create(&ctx, &UpdatePayload::new_document(invoice("100")))
        .await
        .unwrap();
    net.node.pending.commit(&ctx, &first.id()).await.unwrap();

    let second = net
        .node
        .pending
        .create(&ctx, &UpdatePayload::for_document(first.id(), invoice("150")))
        .await
        .unwrap();
    assert_eq!(second.id(), first.id());
    assert_eq!(second.current_version(), first.next_version());
    assert_ne!(second.next_version(), first.current_version());
    assert_eq!(second.field("amount"), Some("150"));

    net.node.pending.commit(&ctx, &second.id()).await.unwrap();

    let old = net
        .node
        .pending
        .get_version(&ctx, &first.id(), &first.current_version())
        .await
        .unwrap();
    assert_eq!(old.field("amount"), Some("100"));

    let latest = net.node.committed.latest(&first.id()).await.unwrap();
    assert_eq!(latest.current_version(), second.current_version());
    assert_eq!(net.ledger.anchors().len(), 2);
}

#[tokio::test]
async fn test_concurrent_create_one_wins() {
    let net = TestNetwork::start().await;
    let alice = net.join(1, "alice");
    let ctx = net.ctx(&alice);

    let base = net
        .node
        .pending
        .create(&ctx, &UpdatePayload::new_document(invoice("1")))
        .await
        .unwrap();
    net.node.pending.commit(&ctx, &base.id()).await.unwrap();

    let payload = UpdatePayload::for_document(base.id(), invoice("2"));
    let (a, b) = tokio::join!(
        net.node.pending.create(&ctx, &payload),
        net.node.pending.create(&ctx, &payload),
    );

    let results = [a.map(|d| d.status()), b.map(|d| d.status())];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(PendingError::PendingDocumentExists(id)) if *id == base.id()))
        .count();
    assert_eq!((wins, conflicts), (1, 1));
}

#[tokio::test]
async fn test_stale_nonce_retried_during_commit() {
    let net = TestNetwork::start().await;
    let alice = net.join(1, "alice");
    let ctx = net.ctx(&alice);

    let created = net
        .node
        .pending
        .create(&ctx, &UpdatePayload::new_document(invoice("7")))
        .await
        .unwrap();
    net.ledger
        .fail_next([LedgerError::NonceTooLow, LedgerError::Underpriced]);

    let receipt = net.node.pending.commit(&ctx, &created.id()).await.unwrap();
    assert_eq!(receipt.tx.account, net.node.config.ledger.account);
    assert_eq!(net.ledger.attempts(), 3);
    assert_eq!(net.ledger.anchors().len(), 1);
}

#[tokio::test]
async fn test_rogue_cosigner_never_anchored() {
    let net = TestNetwork::start().await;
    let alice = net.join(1, "alice");
    let bob = net.join(2, "bob");
    let ctx = net.ctx(&alice);

    // bob's peer answers with a key the resolver has never seen.
    let rogue = Arc::new(IdentityConfig::generate(bob.identity));
    net.node.transport.register_peer("bob", rogue);

    let payload = UpdatePayload::new_document(invoice("3").with_collaborators([bob.identity]));
    let created = net.node.pending.create(&ctx, &payload).await.unwrap();
    let err = net.node.pending.commit(&ctx, &created.id()).await.unwrap_err();

    assert!(matches!(
        err,
        PendingError::Anchor(AnchorError::Signature(SignatureError::KeyMismatch { .. }))
    ));
    assert!(net.ledger.anchors().is_empty());
    assert!(net.node.committed.latest(&created.id()).await.is_err());
}

#[tokio::test]
async fn test_rule_restricts_field_edits() {
    let net = TestNetwork::start().await;
    let alice = net.join(1, "alice");
    let carol = net.join(3, "carol");
    let ctx = net.ctx(&alice);

    let created = net
        .node
        .pending
        .create(&ctx, &UpdatePayload::new_document(invoice("10")))
        .await
        .unwrap();

    let role = net
        .node
        .pending
        .add_role(&ctx, &created.id(), "payers", &[carol.identity])
        .await
        .unwrap();
    let rules = net
        .node
        .pending
        .add_transition_rules(
            &ctx,
            &created.id(),
            &[RuleRequest {
                role: role.key,
                field: FieldKey::named("amount"),
                action: TransitionAction::Edit,
            }],
        )
        .await
        .unwrap();
    assert_eq!(rules.len(), 1);

    // alice is not a payer, so the amount is no longer hers to change.
    let err = net
        .node
        .pending
        .update(&ctx, &UpdatePayload::for_document(created.id(), invoice("20")))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PendingError::Document(DocumentError::Unauthorized { .. })
    ));

    let unchanged = net
        .node
        .pending
        .get(&ctx, &created.id(), DocumentStatus::Pending)
        .await
        .unwrap();
    assert_eq!(unchanged.field("amount"), Some("10"));
}

#[tokio::test]
async fn test_delete_discards_pending_record() {
    let net = TestNetwork::start().await;
    let alice = net.join(1, "alice");
    let ctx = net.ctx(&alice);

    let created = net
        .node
        .pending
        .create(&ctx, &UpdatePayload::new_document(invoice("10")))
        .await
        .unwrap();
    net.node.pending.delete(&ctx, &created.id()).await.unwrap();

    let err = net.node.pending.commit(&ctx, &created.id()).await.unwrap_err();
    assert_eq!(err, PendingError::DocumentNotFound(created.id()));
}
