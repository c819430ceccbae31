use std::time::Duration;

use typed_emitter::*;

// Define your events
#[derive(EventName, Clone, Copy, Debug)]
enum Chat {
    #[event(name = "message")]
    Message,
    #[event(name = "typing")]
    Typing,
}

#[tokio::main]
async fn main() -> Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let emitter = EventEmitter::<String, Chat>::typed();
    println!("Allowed events: {}", emitter.allowed_events());

    // Runs in-line, before `emit` returns
    emitter.add_event_listener(
        Chat::Message,
        Listener::sync(|text: &String| println!("Got message: {text}")),
    )?;

    // Spawned onto the runtime, `emit` doesn't wait for it
    emitter.add_event_listener(
        Chat::Message,
        Listener::task(|text: String| async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            println!("Archived message: {text}");
        }),
    )?;

    let typing = emitter.bind(Chat::Typing);
    typing.emit("alice".into())?;

    let dispatch = emitter.emit(Chat::Message, "Hello, World!".into())?;
    println!(
        "Dispatched to {} sync and {} async listeners",
        dispatch.invoked(),
        dispatch.scheduled()
    );

    emitter.settle().await;
    Ok(())
}
