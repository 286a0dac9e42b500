// Dialect selection.
//
// Once a connection is activated, the generation flag decides which
// domain client serves the rest of the session. The two dialects stay
// separate concrete types; callers match on the variant.

use crate::activation::ActivationStatus;
use crate::client::Connection;
use crate::error::Error;
use crate::hops::HopsClient;
use crate::my::MyClient;

/// The domain API for one home, in whichever dialect it speaks.
pub enum HomeApi {
    /// Pre-LINE_X home served by my.tado.com.
    My(MyClient),
    /// LINE_X home served by hops.tado.com.
    Hops(HopsClient),
}

impl HomeApi {
    /// Select the domain client for an activated connection.
    ///
    /// Errors if activation has not completed — the generation flag does
    /// not exist before that.
    pub fn from_connection(conn: Connection) -> Result<Self, Error> {
        if conn.activation_status() != ActivationStatus::Completed {
            return Err(Error::Activation {
                message: "device activation has not completed".into(),
            });
        }

        if conn.is_line_x() == Some(true) {
            Ok(Self::Hops(HopsClient::from_connection(conn)))
        } else {
            Ok(Self::My(MyClient::from_connection(conn)))
        }
    }

    /// The underlying connection, whichever dialect is active.
    pub fn connection(&self) -> &Connection {
        match self {
            Self::My(client) => client.connection(),
            Self::Hops(client) => client.connection(),
        }
    }

    /// Mutable access, for dialect-independent raw requests.
    pub fn connection_mut(&mut self) -> &mut Connection {
        match self {
            Self::My(client) => client.connection_mut(),
            Self::Hops(client) => client.connection_mut(),
        }
    }
}
