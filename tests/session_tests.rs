//! # Session Tests
//!
//! Print requests run end to end against an in-memory bridge and host:
//! copy ordering, drawer sequencing, printer substitution, and the error
//! paths the POS screen turns into notices.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use common::{FakeBridge, FakeHost};
use nextpos::{
    NextposError, PrintConfig, PrintSession,
    printer::{CutMode, DrawerConfig},
    session::{DrawerOutcome, PrinterChooser, UiEvent},
};
use pretty_assertions::assert_eq;

fn session(bridge: &Arc<FakeBridge>, host: FakeHost) -> PrintSession {
    PrintSession::new(bridge.clone(), Arc::new(host))
}

struct GiveUp;

#[async_trait]
impl PrinterChooser for GiveUp {
    async fn choose(&self, _printers: &[String]) -> Option<String> {
        None
    }
}

struct PickLast;

#[async_trait]
impl PrinterChooser for PickLast {
    async fn choose(&self, printers: &[String]) -> Option<String> {
        printers.last().cloned()
    }
}

// ============================================================================
// COPIES AND DRAWER
// ============================================================================

#[tokio::test]
async fn test_three_copies_then_drawer() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front", "Kitchen"]));
    let host = FakeHost::new(PrintConfig {
        printer: Some("Front".to_string()),
        cut_mode: CutMode::PartialCut,
        feed_before_cut: 3,
        print_copies: 3,
        open_cash_drawer: true,
        drawer_pin: 1,
        ..PrintConfig::default()
    });

    let report = session(&bridge, host)
        .print_invoice("ACC-PSINV-0001", None)
        .await
        .unwrap();

    let sent = bridge.sent();
    assert_eq!(sent.len(), 4);
    for copy in &sent[..3] {
        assert_eq!(copy.printer, "Front");
        assert_eq!(copy.segments, sent[0].segments);
        assert_eq!(copy.segments.len(), 3);
        assert_eq!(copy.segments[2].data, "1B64031D5601");
    }
    assert!(sent[3].is_drawer_kick());
    assert_eq!(sent[3].segments[0].data, "1B70013232");

    assert_eq!(report.copies_sent, 3);
    assert_eq!(report.drawer, DrawerOutcome::Opened);
    assert_eq!(report.invoice.as_deref(), Some("ACC-PSINV-0001"));
    assert!(report.notices.is_empty());
}

#[tokio::test]
async fn test_cut_none_leaves_payload_untouched() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front"]));
    let host = FakeHost::new(PrintConfig {
        printer: Some("Front".to_string()),
        cut_mode: CutMode::None,
        ..PrintConfig::default()
    });
    let expected = host.payload.segments().to_vec();

    session(&bridge, host)
        .print_invoice("ACC-PSINV-0002", None)
        .await
        .unwrap();

    let sent = bridge.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].segments, expected);
}

#[tokio::test]
async fn test_drawer_failure_is_reported_not_raised() {
    let bridge = Arc::new(FakeBridge {
        fail_drawer: true,
        ..FakeBridge::with_printers(&["Front"])
    });
    let host = FakeHost::new(PrintConfig {
        printer: Some("Front".to_string()),
        print_copies: 2,
        open_cash_drawer: true,
        ..PrintConfig::default()
    });

    let report = session(&bridge, host)
        .print_invoice("ACC-PSINV-0003", None)
        .await
        .unwrap();

    assert_eq!(report.copies_sent, 2);
    assert!(matches!(report.drawer, DrawerOutcome::Failed(_)));
    assert_eq!(bridge.sent().len(), 2);
}

#[tokio::test]
async fn test_copy_failure_aborts_job() {
    let bridge = Arc::new(FakeBridge {
        fail_send_at: Some(1),
        ..FakeBridge::with_printers(&["Front"])
    });
    let host = FakeHost::new(PrintConfig {
        printer: Some("Front".to_string()),
        print_copies: 3,
        open_cash_drawer: true,
        ..PrintConfig::default()
    });

    let err = session(&bridge, host)
        .print_invoice("ACC-PSINV-0004", None)
        .await
        .unwrap_err();

    assert!(matches!(err, NextposError::SendFailed(_)));
    let sent = bridge.sent();
    assert_eq!(sent.len(), 1);
    assert!(!sent.iter().any(|s| s.is_drawer_kick()));
}

// ============================================================================
// PRINTER SELECTION
// ============================================================================

#[tokio::test]
async fn test_missing_configured_printer_is_substituted() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Backup", "Kitchen"]));
    let host = FakeHost::new(PrintConfig {
        printer: Some("Front".to_string()),
        ..PrintConfig::default()
    });

    let report = session(&bridge, host)
        .print_invoice("ACC-PSINV-0005", None)
        .await
        .unwrap();

    assert_eq!(report.printer, "Backup");
    assert_eq!(report.substituted_for.as_deref(), Some("Front"));
    assert_eq!(report.notices.len(), 1);
    assert!(report.notices[0].contains("Front"));
    assert!(report.notices[0].contains("Backup"));
    assert_eq!(bridge.sent()[0].printer, "Backup");
}

#[tokio::test]
async fn test_configured_printer_with_no_printers() {
    let bridge = Arc::new(FakeBridge::with_printers(&[]));
    let host = FakeHost::new(PrintConfig {
        printer: Some("Front".to_string()),
        ..PrintConfig::default()
    });

    let err = session(&bridge, host)
        .print_invoice("ACC-PSINV-0006", None)
        .await
        .unwrap_err();

    assert!(matches!(err, NextposError::NoPrintersFound));
    assert!(bridge.sent().is_empty());
}

#[tokio::test]
async fn test_unconfigured_uses_bridge_default() {
    let bridge = Arc::new(FakeBridge::with_printers(&["A", "B"]).with_default("B"));
    let host = FakeHost::new(PrintConfig::default());

    let report = session(&bridge, host)
        .print_invoice("ACC-PSINV-0007", None)
        .await
        .unwrap();

    assert_eq!(report.printer, "B");
    assert!(report.substituted_for.is_none());
    assert_eq!(bridge.finds.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_default_falls_back_to_chooser() {
    let bridge = Arc::new(FakeBridge::with_printers(&["A", "B"]));
    let host = FakeHost::new(PrintConfig::default());

    let report = session(&bridge, host)
        .with_chooser(Arc::new(PickLast))
        .print_invoice("ACC-PSINV-0008", None)
        .await
        .unwrap();

    assert_eq!(report.printer, "B");
    assert_eq!(bridge.finds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_chooser_giving_up_sends_nothing() {
    let bridge = Arc::new(FakeBridge::with_printers(&["A"]));
    let host = FakeHost::new(PrintConfig::default());

    let err = session(&bridge, host)
        .with_chooser(Arc::new(GiveUp))
        .print_invoice("ACC-PSINV-0009", None)
        .await
        .unwrap_err();

    assert!(matches!(err, NextposError::NoPrintersFound));
    assert!(bridge.sent().is_empty());
}

// ============================================================================
// CONNECTION
// ============================================================================

#[tokio::test]
async fn test_connects_once_across_prints() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front"]));
    let session = session(&bridge, FakeHost::new(PrintConfig::default()));

    session.print_invoice("ACC-PSINV-0010", None).await.unwrap();
    session.print_invoice("ACC-PSINV-0011", None).await.unwrap();

    assert_eq!(bridge.connects.load(Ordering::SeqCst), 1);
    assert_eq!(bridge.sent().len(), 2);
}

#[tokio::test]
async fn test_signing_failure_blocks_printing() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front"]));
    let host = FakeHost {
        fail_sign: true,
        ..FakeHost::new(PrintConfig::default())
    };

    let err = session(&bridge, host)
        .print_invoice("ACC-PSINV-0012", None)
        .await
        .unwrap_err();

    assert!(matches!(err, NextposError::SigningFailed(_)));
    assert!(!bridge.active.load(Ordering::SeqCst));
    assert!(bridge.sent().is_empty());
}

// ============================================================================
// UI EVENTS
// ============================================================================

#[tokio::test]
async fn test_print_current_requires_pos_invoice() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front"]));
    let session = session(&bridge, FakeHost::new(PrintConfig::default()));

    let err = session
        .dispatch(UiEvent::PrintCurrent {
            doctype: "Sales Invoice".to_string(),
            name: "ACC-SINV-0001".to_string(),
            pos_profile: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, NextposError::NoInvoiceOpen));
    assert_eq!(bridge.connects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_print_current_forwards_profile() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front"]));
    let host = Arc::new(FakeHost::new(PrintConfig::default()));
    let session = PrintSession::new(bridge.clone(), host.clone());

    session
        .dispatch(UiEvent::PrintCurrent {
            doctype: "POS Invoice".to_string(),
            name: "ACC-PSINV-0013".to_string(),
            pos_profile: Some("Main Counter".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(
        *host.config_requests.lock().unwrap(),
        vec![Some("Main Counter".to_string())]
    );
    assert_eq!(
        *host.payload_requests.lock().unwrap(),
        vec!["ACC-PSINV-0013".to_string()]
    );
}

#[tokio::test]
async fn test_reprint_last_without_invoices() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front"]));
    let session = session(&bridge, FakeHost::new(PrintConfig::default()));

    let err = session
        .dispatch(UiEvent::ReprintLast { pos_profile: None })
        .await
        .unwrap_err();

    assert!(matches!(err, NextposError::NoInvoiceFound));
    assert!(bridge.sent().is_empty());
}

#[tokio::test]
async fn test_reprint_last_prints_newest() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front"]));
    let host = FakeHost {
        last_invoice: Some("ACC-PSINV-0099".to_string()),
        ..FakeHost::new(PrintConfig::default())
    };

    let report = session(&bridge, host)
        .reprint_last(None)
        .await
        .unwrap();

    assert_eq!(report.invoice.as_deref(), Some("ACC-PSINV-0099"));
    assert_eq!(bridge.sent().len(), 1);
}

#[tokio::test]
async fn test_test_print_sends_sample_with_full_cut() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front"]).with_default("Front"));
    let session = session(&bridge, FakeHost::new(PrintConfig::default()));

    let report = session.dispatch(UiEvent::TestPrint).await.unwrap();

    assert_eq!(report.printer, "Front");
    assert!(report.invoice.is_none());
    let sent = bridge.sent();
    assert_eq!(sent.len(), 1);
    let last = sent[0].segments.last().unwrap();
    assert_eq!(last.data, "1B64051D5600");
}

#[tokio::test]
async fn test_test_drawer_default_pulse() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front", "Kitchen"]));
    let session = session(&bridge, FakeHost::new(PrintConfig::default()));

    let report = session
        .dispatch(UiEvent::TestDrawer { drawer: None })
        .await
        .unwrap();

    assert_eq!(report.drawer, DrawerOutcome::Opened);
    let sent = bridge.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].printer, "Front");
    assert_eq!(sent[0].segments[0].data, "1B70003232");
}

#[tokio::test]
async fn test_test_drawer_custom_pulse() {
    let bridge = Arc::new(FakeBridge::with_printers(&["Front"]));
    let session = session(&bridge, FakeHost::new(PrintConfig::default()));

    session
        .test_drawer(DrawerConfig {
            pin: 1,
            pulse_on: 0x19,
            pulse_off: 0xFA,
        })
        .await
        .unwrap();

    assert_eq!(bridge.sent()[0].segments[0].data, "1B700119FA");
}

#[tokio::test]
async fn test_test_drawer_without_printers() {
    let bridge = Arc::new(FakeBridge::with_printers(&[]));
    let session = session(&bridge, FakeHost::new(PrintConfig::default()));

    let err = session.test_drawer(DrawerConfig::default()).await.unwrap_err();
    assert!(matches!(err, NextposError::NoPrintersFound));
}
