mod blacklist;
mod helpers;
mod obtain_pair;
mod refresh;
mod sliding;
mod verify_token;
mod whoami;
