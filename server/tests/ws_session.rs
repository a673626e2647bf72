use std::time::Duration;

use futures::{SinkExt, StreamExt};
use sketchparty_protocol::{ClientToServer, DrawStroke, ServerToClient};
use sketchparty_server::{router, AppState};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn serve() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(AppState::new())).await.unwrap();
    });
    format!("ws://{addr}/ws")
}

async fn connect(url: &str) -> Client {
    let (ws, _) = connect_async(url).await.unwrap();
    ws
}

async fn send(ws: &mut Client, cmd: &ClientToServer) {
    let text = serde_json::to_string(cmd).unwrap();
    ws.send(Message::Text(text)).await.unwrap();
}

/// Reads events until `pick` yields, failing the test after a timeout.
async fn wait_for<T>(ws: &mut Client, mut pick: impl FnMut(ServerToClient) -> Option<T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let msg = ws.next().await.expect("connection closed").unwrap();
            if let Message::Text(text) = msg {
                let ev: ServerToClient = serde_json::from_str(&text).unwrap();
                if let Some(out) = pick(ev) {
                    return out;
                }
            }
        }
    })
    .await
    .expect("timed out waiting for an event")
}

#[tokio::test]
async fn two_player_session_plays_a_full_round() {
    let url = serve().await;

    let mut ada = connect(&url).await;
    let mut brian = connect(&url).await;

    let ada_id = wait_for(&mut ada, |ev| match ev {
        ServerToClient::Hello { your_id } => Some(your_id),
        _ => None,
    })
    .await;
    wait_for(&mut brian, |ev| {
        matches!(ev, ServerToClient::Hello { .. }).then_some(())
    })
    .await;

    send(
        &mut ada,
        &ClientToServer::CreateRoom {
            username: "ada".into(),
            room: "attic".into(),
        },
    )
    .await;
    wait_for(&mut ada, |ev| {
        matches!(ev, ServerToClient::RoomCreated { room } if room == "attic").then_some(())
    })
    .await;

    send(
        &mut brian,
        &ClientToServer::JoinRoom {
            username: "brian".into(),
            room: "attic".into(),
        },
    )
    .await;
    wait_for(&mut brian, |ev| {
        matches!(ev, ServerToClient::JoinedRoom { room } if room == "attic").then_some(())
    })
    .await;

    // both see the full roster once brian is seated
    wait_for(&mut ada, |ev| match ev {
        ServerToClient::UpdatePlayerList(players) if players.len() == 2 => Some(()),
        _ => None,
    })
    .await;

    send(&mut ada, &ClientToServer::StartGame("attic".into())).await;

    let drawer = wait_for(&mut brian, |ev| match ev {
        ServerToClient::NewRound { drawer_id, .. } => Some(drawer_id),
        _ => None,
    })
    .await;
    assert_eq!(drawer, ada_id);

    let word = wait_for(&mut ada, |ev| match ev {
        ServerToClient::YourWord { word } => Some(word),
        _ => None,
    })
    .await;

    // strokes reach the guesser, relayed verbatim
    send(
        &mut ada,
        &ClientToServer::Draw(DrawStroke {
            x: 10.0,
            y: 20.0,
            room: "attic".into(),
            drawing: true,
        }),
    )
    .await;
    let stroke = wait_for(&mut brian, |ev| match ev {
        ServerToClient::Draw(stroke) => Some(stroke),
        _ => None,
    })
    .await;
    assert_eq!((stroke.x, stroke.y, stroke.drawing), (10.0, 20.0, true));

    send(
        &mut brian,
        &ClientToServer::Message {
            room: "attic".into(),
            message: word,
        },
    )
    .await;

    let roster = wait_for(&mut ada, |ev| match ev {
        ServerToClient::UpdatePlayerList(players) if players.iter().any(|p| p.score > 0) => {
            Some(players)
        }
        _ => None,
    })
    .await;
    let scores: Vec<(String, u32)> = roster
        .iter()
        .map(|p| (p.username.clone(), p.score))
        .collect();
    assert!(scores.contains(&("brian".to_string(), 10)));
    assert!(scores.contains(&("ada".to_string(), 5)));

    // the guess cascades into a new round with the drawer rotated
    let next_drawer = wait_for(&mut ada, |ev| match ev {
        ServerToClient::NewRound { drawer_id, .. } => Some(drawer_id),
        _ => None,
    })
    .await;
    assert_ne!(next_drawer, ada_id);
}

#[tokio::test]
async fn joining_a_missing_room_fails_without_creating_it() {
    let url = serve().await;
    let mut ws = connect(&url).await;
    wait_for(&mut ws, |ev| {
        matches!(ev, ServerToClient::Hello { .. }).then_some(())
    })
    .await;

    for _ in 0..2 {
        send(
            &mut ws,
            &ClientToServer::JoinRoom {
                username: "ada".into(),
                room: "nowhere".into(),
            },
        )
        .await;
        let msg = wait_for(&mut ws, |ev| match ev {
            ServerToClient::ErrorMsg(msg) => Some(msg),
            _ => None,
        })
        .await;
        assert!(msg.contains("not found"));
    }
}

#[tokio::test]
async fn disconnect_hands_the_roster_to_the_survivors() {
    let url = serve().await;

    let mut ada = connect(&url).await;
    let mut brian = connect(&url).await;
    for ws in [&mut ada, &mut brian] {
        wait_for(ws, |ev| matches!(ev, ServerToClient::Hello { .. }).then_some(())).await;
    }

    send(
        &mut ada,
        &ClientToServer::CreateRoom {
            username: "ada".into(),
            room: "attic".into(),
        },
    )
    .await;
    wait_for(&mut ada, |ev| {
        matches!(ev, ServerToClient::RoomCreated { .. }).then_some(())
    })
    .await;
    send(
        &mut brian,
        &ClientToServer::JoinRoom {
            username: "brian".into(),
            room: "attic".into(),
        },
    )
    .await;
    wait_for(&mut ada, |ev| match ev {
        ServerToClient::UpdatePlayerList(players) if players.len() == 2 => Some(()),
        _ => None,
    })
    .await;

    brian.close(None).await.unwrap();

    let roster = wait_for(&mut ada, |ev| match ev {
        ServerToClient::UpdatePlayerList(players) if players.len() == 1 => Some(players),
        _ => None,
    })
    .await;
    assert_eq!(roster[0].username, "ada");
}
