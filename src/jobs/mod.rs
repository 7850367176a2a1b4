pub mod sale_stats_poller;
