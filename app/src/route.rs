use dioxus::prelude::*;

use crate::components::Layout;
use crate::pages::{Claim, Register};

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
    #[route("/")]
    Register {},  // Activation progress first - mining starts here
    #[route("/claim")]
    Claim {},
}
