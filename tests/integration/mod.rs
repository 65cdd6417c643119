// End-to-end tests over real stores and the stdio server
mod ledger_backends;
mod server_roundtrip;
