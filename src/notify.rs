//! Legacy-client notification walker
//!
//! GTK 2 applications cannot be told to reload through xsettingsd; they only
//! listen for a _GTK_READ_RCFILES ClientMessage on their own windows. This
//! module walks every window tree of the display and delivers that message to
//! each client window, identified by the presence of the WM_STATE property.

use anyhow::{Context, Result};
use tracing::{debug, info};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, CLIENT_MESSAGE_EVENT, ClientMessageData, ClientMessageEvent, ConnectionExt,
    EventMask, Window,
};
use x11rb::rust_connection::RustConnection;

use crate::constants::{atoms, diag};

/// Window-tree access used by the walker. The X11 connection implements
/// this; tests drive the traversal against an in-memory tree.
pub trait WindowTree {
    /// Whether the window carries WM_STATE. Presence alone decides
    /// addressability; the value is never read.
    fn has_state_property(&self, window: Window) -> Result<bool>;

    /// Direct children, bottom-to-top stacking order as the server reports
    fn children(&self, window: Window) -> Result<Vec<Window>>;

    /// Window title for diagnostics, if set
    fn window_name(&self, window: Window) -> Result<Option<String>>;

    /// Deliver the reload message to exactly this window, no propagation
    fn send_reload_message(&self, window: Window) -> Result<()>;
}

/// Atoms interned once per connection
struct InternedAtoms {
    wm_state: Atom,
    gtk_read_rcfiles: Atom,
    wm_name: Atom,
}

impl InternedAtoms {
    fn new(conn: &RustConnection) -> Result<Self> {
        Ok(Self {
            wm_state: conn
                .intern_atom(false, atoms::WM_STATE.as_bytes())
                .context("Failed to intern WM_STATE atom")?
                .reply()
                .context("Failed to get reply for WM_STATE atom")?
                .atom,
            gtk_read_rcfiles: conn
                .intern_atom(false, atoms::GTK_READ_RCFILES.as_bytes())
                .context("Failed to intern _GTK_READ_RCFILES atom")?
                .reply()
                .context("Failed to get reply for _GTK_READ_RCFILES atom")?
                .atom,
            wm_name: conn
                .intern_atom(false, atoms::WM_NAME.as_bytes())
                .context("Failed to intern WM_NAME atom")?
                .reply()
                .context("Failed to get reply for WM_NAME atom")?
                .atom,
        })
    }
}

/// WindowTree over a live X11 connection
struct XTree<'a> {
    conn: &'a RustConnection,
    atoms: InternedAtoms,
}

impl WindowTree for XTree<'_> {
    fn has_state_property(&self, window: Window) -> Result<bool> {
        let prop = self
            .conn
            .get_property(false, window, self.atoms.wm_state, AtomEnum::ANY, 0, 0)
            .context(format!("Failed to query WM_STATE for window {window}"))?
            .reply()
            .context(format!("Failed to get WM_STATE reply for window {window}"))?;
        // format is 0 when the property does not exist on the window
        Ok(prop.format != 0)
    }

    fn children(&self, window: Window) -> Result<Vec<Window>> {
        let reply = self
            .conn
            .query_tree(window)
            .context(format!("Failed to query children of window {window}"))?
            .reply()
            .context(format!("Failed to get QueryTree reply for window {window}"))?;
        Ok(reply.children)
    }

    fn window_name(&self, window: Window) -> Result<Option<String>> {
        let prop = self
            .conn
            .get_property(false, window, self.atoms.wm_name, AtomEnum::STRING, 0, 64)
            .context(format!("Failed to query WM_NAME for window {window}"))?
            .reply()
            .context(format!("Failed to get WM_NAME reply for window {window}"))?;
        if prop.value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(&prop.value).into_owned()))
        }
    }

    fn send_reload_message(&self, window: Window) -> Result<()> {
        let event = ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 8,
            sequence: 0,
            window,
            type_: self.atoms.gtk_read_rcfiles,
            data: ClientMessageData::from([0u8; 20]),
        };
        // Empty mask and propagate=false: the message must reach exactly
        // this window, never bubble to ancestors
        self.conn
            .send_event(false, window, EventMask::NO_EVENT, &event)
            .context(format!("Failed to send _GTK_READ_RCFILES to window {window}"))?;
        Ok(())
    }
}

/// Walk the subtree rooted at `window`, delivering the reload message to
/// every WM_STATE window, and report whether anything in the subtree was
/// notified.
///
/// A WM_STATE window terminates its branch: descendants of a client window
/// belong to that client and must not receive their own copy. A depth-1
/// window whose whole subtree went unnotified gets the message itself as a
/// fallback, because some window managers keep WM_STATE off their frame
/// windows. The fallback fires at depth 1 only, also for frames that nest
/// their client deeper; that asymmetry is intentional and covered by tests.
fn notify_subtree<T: WindowTree>(
    tree: &T,
    window: Window,
    depth: usize,
    ancestors: &mut Vec<Window>,
) -> Result<bool> {
    let addressable = tree.has_state_property(window)?;
    let mut sent_here = false;
    let mut delivered = false;

    if addressable {
        tree.send_reload_message(window)?;
        sent_here = true;
        delivered = true;
    } else {
        ancestors.push(window);
        let children = tree.children(window)?;
        for child in children {
            delivered |= notify_subtree(tree, child, depth + 1, ancestors)?;
        }
        ancestors.pop();

        if !delivered && depth == 1 {
            tree.send_reload_message(window)?;
            sent_here = true;
            delivered = true;
        }
    }

    let name: String = tree
        .window_name(window)?
        .unwrap_or_default()
        .chars()
        .take(diag::NAME_TRUNCATE)
        .collect();
    debug!(
        window = window,
        state = addressable,
        sent = sent_here,
        name = %name,
        ancestors = ?ancestors,
        "Visited window"
    );

    Ok(delivered)
}

/// Notify all legacy clients on every screen of the default display.
///
/// No reachable display is a total failure of this pipeline; any protocol
/// error mid-walk aborts it too. There is no retry.
pub fn notify_legacy_clients() -> Result<()> {
    let (conn, _) = x11rb::connect(None).context("Failed to connect to X11 display")?;
    let atoms = InternedAtoms::new(&conn)?;
    let tree = XTree { conn: &conn, atoms };

    for (screen_num, screen) in conn.setup().roots.iter().enumerate() {
        let mut ancestors = Vec::new();
        notify_subtree(&tree, screen.root, 0, &mut ancestors)
            .context(format!("Window walk failed on screen {screen_num}"))?;
        info!(screen = screen_num, root = screen.root, "Notified legacy clients on screen");
    }

    conn.flush().context("Failed to flush X11 connection")?;
    Ok(())
}
