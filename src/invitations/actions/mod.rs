mod invite;
mod prune;
mod resolve;

pub use invite::InviteToTeamAction;
pub use prune::PruneExpiredInvitationsAction;
pub use resolve::ResolveInvitationAction;
