pub mod sync_portfolio_routine;
