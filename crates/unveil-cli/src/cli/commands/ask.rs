use unveil_core::chat;

pub fn run(question: &str) {
    let reply = chat::respond(question);
    println!("{}", reply.text);
    if !reply.follow_ups.is_empty() {
        println!();
        for follow_up in reply.follow_ups {
            println!("  → {follow_up}");
        }
    }
}
