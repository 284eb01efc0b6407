//! Drives a notifier through a scripted session and prints the tree after
//! each step. Run with `RUST_LOG=melba=debug` to watch the lifecycle.

use melba::{Notifier, Position, PromiseMessages, TimerPhase, ToastOptions};

fn dump(notifier: &Notifier, label: &str) {
    println!("-- {label}");
    notifier.with_document(|doc| {
        for container in doc.find_by_class("melba-container") {
            let position = doc.attr(container, "data-position").unwrap_or("?");
            for toast in doc.children(container) {
                let message = doc
                    .descendants_with_class(*toast, "melba-msg")
                    .first()
                    .and_then(|&m| doc.text(m))
                    .unwrap_or("")
                    .to_string();
                let progress = notifier
                    .progress_fraction(*toast)
                    .map(|f| format!(" [{:>3.0}%]", f * 100.0))
                    .unwrap_or_default();
                println!("   {position:<13} {message}{progress}");
            }
        }
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let toasts = Notifier::new();
    toasts.update(0);

    toasts.success("profile saved", None);
    toasts.error("connection lost", None);
    toasts.warning(
        "disk almost full",
        Some(ToastOptions::default().position(Position::BottomLeft)),
    );
    dump(&toasts, "after three toasts");

    // Halfway through the default 3s countdown, hover the first toast.
    toasts.update(1_500);
    let hovered = toasts.with_document(|doc| {
        let container = doc
            .find_with_attr("melba-container", "data-position", "top-right")
            .unwrap();
        doc.first_child(container).unwrap()
    });
    toasts.pointer_entered(hovered);
    assert_eq!(toasts.timer_phase(hovered), Some(TimerPhase::Paused));
    dump(&toasts, "hovering at t=1.5s");

    toasts.pointer_left(hovered);
    toasts.update(4_000);
    // Let the exit-animation fallbacks run; no real animations here.
    toasts.update(4_400);
    dump(&toasts, "countdowns elapsed at t=4.4s");

    let report = toasts
        .promise(
            async { Ok::<_, String>(3usize) },
            PromiseMessages::new("importing...", "import finished", "import failed"),
            None,
        )
        .await;
    println!("imported {} records", report.unwrap_or_default());
    dump(&toasts, "after the wrapped task");

    toasts.clear();
    dump(&toasts, "after clear");
}
