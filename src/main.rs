use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    // Diagnostics from the tracer itself go to stderr, filtered by RUST_LOG.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();

    dabug::msg!("A");
    thing_a();
    dabug::msg!("B");
    thing_b();

    dabug::msg!("wat");

    thing_c();
    dabug::flush();
}

fn thing_a() {
    println!("thing_a");
}

fn thing_b() {
    println!("thing_b");
    dabug::objs!(1, "two", [3.0, 4.5]);
}

fn thing_c() {
    println!("thing_c");
    dabug::msg!("C");
    dabug::here!();
}
