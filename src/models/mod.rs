pub mod category;
pub mod common;
pub mod curb;
pub mod dashboard;
pub mod download;
pub mod event;
pub mod gallery;
pub mod grade;
pub mod judgment;
pub mod listing;
pub mod nav_item;
pub mod news;
pub mod participation;
pub mod permission;
pub mod position;
pub mod program;
pub mod result;
pub mod role;
pub mod student;
pub mod team;
pub mod user;
