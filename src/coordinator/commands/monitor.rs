use crate::prelude::*;
use crate::controller::session::ChannelData;

/// Prints every unsolicited frame until Ctrl+C or the server hangs up.
pub struct Monitor<'a> {
    session: &'a mut Session,
    channels: Channels,
}

impl<'a> Monitor<'a> {
    pub fn new(session: &'a mut Session, channels: Channels) -> Self {
        Self { session, channels }
    }

    /// Returns the number of frames printed.
    pub async fn run(self) -> Result<usize> {
        let mut shutdown = self.channels.shutdown.subscribe();
        let mut frames = self.channels.from_controller.subscribe();

        info!("Listening for messages, press Ctrl+C to stop");

        let printer = async {
            let mut count = 0;
            loop {
                match frames.recv().await {
                    Ok(ChannelData::Message(message)) => {
                        println!("{}", message);
                        count += 1;
                    }
                    Ok(ChannelData::Closed) | Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(n)) => warn!("monitor skipped {} messages", n),
                }
            }
            count
        };

        let (result, count) = futures::join!(
            self.session.listen(&mut shutdown, &self.channels.from_controller),
            printer
        );
        result?;

        Ok(count)
    }
}
